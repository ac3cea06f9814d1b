//! CLI frontend for the Focusquest quest engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fq",
    about = "Focusquest: focus sessions as seeded quests",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the beats planned for a session
    Plan {
        /// Session length in minutes
        #[arg(short, long, default_value = "25")]
        minutes: u32,

        /// Quest seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Hero level
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Hero class: warrior, mage, rogue
        #[arg(short, long, default_value = "warrior")]
        class: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Roll the base reward for a session
    Loot {
        /// Session length in minutes
        #[arg(short, long, default_value = "25")]
        minutes: u32,

        /// Quest seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Hero level
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Hero class: warrior, mage, rogue
        #[arg(short, long, default_value = "warrior")]
        class: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Distribute a reward across the planned beats and narrate them
    Ledger {
        /// Session length in minutes
        #[arg(short, long, default_value = "25")]
        minutes: u32,

        /// Quest seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Hero level
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Hero class: warrior, mage, rogue
        #[arg(short, long, default_value = "warrior")]
        class: String,

        /// Total xp to distribute (default: the rolled reward)
        #[arg(long)]
        xp: Option<i64>,

        /// Total gold to distribute (default: the rolled reward)
        #[arg(long)]
        gold: Option<i64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a whole quest against in-memory storage
    Simulate {
        /// Session length in minutes
        #[arg(short, long, default_value = "25")]
        minutes: u32,

        /// Hero class: warrior, mage, rogue
        #[arg(short, long, default_value = "warrior")]
        class: String,

        /// Quest type: focus, study, chore
        #[arg(short = 't', long, default_value = "focus")]
        quest_type: String,

        /// Give up this many seconds in instead of finishing
        #[arg(short, long)]
        retreat_after: Option<i64>,

        /// Engine config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            minutes,
            seed,
            level,
            class,
            json,
        } => commands::plan::run(minutes, seed, level, &class, json),
        Commands::Loot {
            minutes,
            seed,
            level,
            class,
            json,
        } => commands::loot::run(minutes, seed, level, &class, json),
        Commands::Ledger {
            minutes,
            seed,
            level,
            class,
            xp,
            gold,
            json,
        } => commands::ledger::run(minutes, seed, level, &class, xp, gold, json),
        Commands::Simulate {
            minutes,
            class,
            quest_type,
            retreat_after,
            config,
            json,
        } => commands::simulate::run(
            minutes,
            &class,
            &quest_type,
            retreat_after,
            config.as_deref(),
            json,
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
