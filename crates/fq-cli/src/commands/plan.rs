use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use fq_engine::planner::DurationTier;

pub fn run(minutes: u32, seed: u64, level: u32, class: &str, json: bool) -> Result<(), String> {
    let class = super::parse_class(class)?;
    let spec = super::offline_spec(minutes, seed, level, class);
    let beats = fq_engine::plan(&spec);

    if json {
        return super::print_json(&beats);
    }

    if beats.is_empty() {
        println!("  Nothing to plan for a {minutes} minute session.");
        return Ok(());
    }

    println!(
        "  {} {minutes} min {}",
        "Plan".bold(),
        format!("({:?}, seed={seed})", DurationTier::from_minutes(minutes)).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "At", "Beat", "Major"]);
    for beat in &beats {
        table.add_row(vec![
            beat.idx.to_string(),
            super::offset(spec.start_at, beat.due_at),
            super::beat_kind(beat),
            if beat.is_major { "yes".into() } else { String::new() },
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} beats", beats.len());
    Ok(())
}
