use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use fq_core::{QuestEvent, QuestLoot, RewardLedger};
use fq_engine::QuestContext;
use fq_engine::economy::roll_loot;

#[derive(Serialize)]
struct LedgerReport {
    totals: QuestLoot,
    ledger: RewardLedger,
    events: Vec<QuestEvent>,
}

pub fn run(
    minutes: u32,
    seed: u64,
    level: u32,
    class: &str,
    xp: Option<i64>,
    gold: Option<i64>,
    json: bool,
) -> Result<(), String> {
    let class = super::parse_class(class)?;
    let spec = super::offline_spec(minutes, seed, level, class);
    let beats = fq_engine::plan(&spec);

    let rolled = roll_loot(minutes, spec.hero_level, class, seed);
    let totals = QuestLoot::new(xp.unwrap_or(rolled.xp), gold.unwrap_or(rolled.gold));
    let ctx = QuestContext {
        quest_id: spec.quest_id,
        base_seed: seed,
        hero_level: spec.hero_level,
        class_type: class,
    };
    let ledger = fq_engine::allocate(&ctx, &beats, &totals);
    let events: Vec<QuestEvent> = beats
        .iter()
        .map(|beat| {
            let (xp, gold) = ledger.deltas_for(beat.idx);
            fq_engine::resolve_from_ledger(&ctx, beat, xp, gold)
        })
        .collect();

    if json {
        return super::print_json(&LedgerReport {
            totals,
            ledger,
            events,
        });
    }

    println!(
        "  {} {}",
        "Ledger".bold(),
        format!("v{} {}", ledger.version, &ledger.hash[..16]).dimmed()
    );
    println!("  Distributing {} XP and {} gold", totals.xp, totals.gold);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "At", "Beat", "XP", "Gold", "Story"]);
    for (beat, event) in beats.iter().zip(&events) {
        table.add_row(vec![
            beat.idx.to_string(),
            super::offset(spec.start_at, beat.due_at),
            super::beat_kind(beat),
            event.xp_delta.to_string(),
            event.gold_delta.to_string(),
            event.message.clone(),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} XP, {} gold across {} entries",
        ledger.total_xp(),
        ledger.total_gold(),
        ledger.entries.len()
    );
    Ok(())
}
