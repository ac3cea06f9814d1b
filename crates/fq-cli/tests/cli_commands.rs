//! Integration tests for the `fq` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fq() -> Command {
    Command::cargo_bin("fq").unwrap()
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

#[test]
fn plan_lists_medium_session_beats() {
    fq().args(["plan", "-m", "25", "-s", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medium").and(predicate::str::contains("7 beats")));
}

#[test]
fn plan_is_reproducible() {
    let first = fq().args(["plan", "--json"]).output().unwrap();
    let second = fq().args(["plan", "--json"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn plan_json_has_one_entry_per_beat() {
    let out = fq().args(["plan", "-m", "10", "--json"]).output().unwrap();
    let beats: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(beats.as_array().map(Vec::len), Some(4));
}

#[test]
fn plan_rejects_unknown_class() {
    fq().args(["plan", "-c", "bard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown class"));
}

// ---------------------------------------------------------------------------
// loot
// ---------------------------------------------------------------------------

#[test]
fn loot_rolls_base_reward() {
    fq().args(["loot", "-m", "25", "-l", "1", "-c", "warrior"])
        .assert()
        .success()
        .stdout(predicate::str::contains("210").and(predicate::str::contains("gold")));
}

#[test]
fn loot_json() {
    fq().args(["loot", "-m", "25", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"xp\": 210").and(predicate::str::contains("\"gold\": 10")));
}

// ---------------------------------------------------------------------------
// ledger
// ---------------------------------------------------------------------------

#[test]
fn ledger_distributes_rolled_totals() {
    fq().args(["ledger", "-m", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Distributing 210 XP and 10 gold"));
}

#[test]
fn ledger_accepts_explicit_totals() {
    let out = fq()
        .args(["ledger", "-m", "45", "--xp", "100", "--gold", "7", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["totals"]["xp"], 100);
    assert_eq!(report["events"].as_array().map(Vec::len), Some(10));
    assert_eq!(report["ledger"]["hash"].as_str().map(str::len), Some(64));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_completes_quest() {
    fq().args(["simulate", "-m", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quest complete"));
}

#[test]
fn simulate_json_reports_outcome() {
    let out = fq().args(["simulate", "-m", "15", "--json"]).output().unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["outcome"], "completed");
    assert_eq!(report["quest"]["completed"], true);
}

#[test]
fn simulate_early_retreat_is_free() {
    fq().args(["simulate", "-m", "25", "-r", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quest abandoned").and(predicate::str::contains("no penalty")));
}

#[test]
fn simulate_late_retreat_is_cursed() {
    fq().args(["simulate", "-m", "25", "-r", "600"])
        .assert()
        .success()
        .stdout(predicate::str::contains("curse"));
}

#[test]
fn simulate_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, r#"{ "hero_name": "Tester" }"#).unwrap();

    fq().args(["simulate", "-m", "5", "--config", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tester"));
}

#[test]
fn simulate_missing_config_fails() {
    fq().args(["simulate", "--config", "/nonexistent/engine.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}

#[test]
fn simulate_rejects_zero_minutes() {
    fq().args(["simulate", "-m", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid quest duration"));
}
