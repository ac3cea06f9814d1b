pub mod ledger;
pub mod loot;
pub mod plan;
pub mod simulate;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use fq_core::{ClassType, PlannedEvent, QuestId};
use fq_engine::PlanSpec;

/// Parse a hero class name.
fn parse_class(name: &str) -> Result<ClassType, String> {
    name.parse().map_err(|e: fq_core::CoreError| e.to_string())
}

/// Plan input for the offline commands. The quest id comes from the seed so
/// that output is reproducible.
fn offline_spec(minutes: u32, seed: u64, level: u32, class: ClassType) -> PlanSpec {
    PlanSpec {
        quest_id: QuestId(Uuid::from_u64_pair(seed, 0)),
        duration_minutes: minutes,
        seed,
        start_at: DateTime::<Utc>::UNIX_EPOCH,
        hero_level: level.max(1),
        class_type: class,
    }
}

/// `mm:ss` after the session start.
fn offset(start: DateTime<Utc>, at: DateTime<Utc>) -> String {
    let secs = (at - start).num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn beat_kind(beat: &PlannedEvent) -> String {
    match beat.mob_tier {
        Some(tier) => format!("{} ({tier})", beat.event_type),
        None => beat.event_type.to_string(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| format!("json error: {e}"))?;
    println!("{out}");
    Ok(())
}
