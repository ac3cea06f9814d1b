use colored::Colorize;

use fq_engine::economy::roll_loot;

pub fn run(minutes: u32, seed: u64, level: u32, class: &str, json: bool) -> Result<(), String> {
    let class = super::parse_class(class)?;
    let loot = roll_loot(minutes, level.max(1), class, seed);

    if json {
        return super::print_json(&loot);
    }

    println!(
        "  {} {}",
        "Loot".bold(),
        format!("({minutes} min, level {}, {class}, seed={seed})", level.max(1)).dimmed()
    );
    println!("  {} XP", loot.xp.to_string().green());
    println!("  {} gold", loot.gold.to_string().yellow());
    if loot.items.is_empty() {
        println!("  {}", "(no item)".dimmed());
    }
    for item in &loot.items {
        println!("  {} [{}]", item.name.bold(), item.rarity);
    }
    Ok(())
}
