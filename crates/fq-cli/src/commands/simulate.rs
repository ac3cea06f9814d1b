use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use colored::Colorize;
use serde::Serialize;

use fq_core::{EventOutcome, QuestEvent, QuestType};
use fq_engine::adapter::{CurseConfig, GraceCurse, LogNotifier, ManualClock, MemoryStore, NoValidator};
use fq_engine::ports::{HeroStore, QuestStore};
use fq_engine::{
    Collaborators, CompletionSummary, EngineConfig, FeedReplayer, QuestEngine, RetreatSummary,
    StartedQuest,
};

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum Outcome {
    Completed(CompletionSummary),
    Retreated(RetreatSummary),
}

#[derive(Serialize)]
struct SimulationReport {
    started: StartedQuest,
    events: Vec<QuestEvent>,
    #[serde(flatten)]
    outcome: Outcome,
}

pub fn run(
    minutes: u32,
    class: &str,
    quest_type: &str,
    retreat_after: Option<i64>,
    config: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let class = super::parse_class(class)?;
    let quest_type: QuestType = quest_type.parse().map_err(|e: fq_core::CoreError| e.to_string())?;
    let config = load_config(config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))?;
    let report = runtime.block_on(simulate(minutes, class, quest_type, retreat_after, config, json))?;

    if json {
        return super::print_json(&report);
    }
    print_outcome(&report.outcome);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config '{}': {e}", path.display()))?;
    EngineConfig::from_json(&text).map_err(|e| format!("invalid config '{}': {e}", path.display()))
}

async fn simulate(
    minutes: u32,
    class: fq_core::ClassType,
    quest_type: QuestType,
    retreat_after: Option<i64>,
    config: EngineConfig,
    quiet: bool,
) -> Result<SimulationReport, String> {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(LogNotifier::new());
    let start = Utc::now();
    let clock = Arc::new(ManualClock::new(start));
    let ports = Collaborators {
        quests: store.clone(),
        heroes: store.clone(),
        notifier: notifier.clone(),
        status: Arc::new(GraceCurse::new(CurseConfig::default())),
        validator: Arc::new(NoValidator),
        clock: clock.clone(),
    };
    let mut feed = FeedReplayer::from_config(store.clone(), notifier, &config);
    let engine = QuestEngine::new(ports, config);

    let started = engine
        .start(minutes, class, quest_type)
        .await
        .map_err(|e| e.to_string())?;
    let quest = &started.quest;
    let hero = store
        .current_hero()
        .await
        .map_err(|e| e.to_string())?
        .ok_or("hero was not created")?;
    let beats = store
        .get_quest_plan(quest.id)
        .await
        .map_err(|e| e.to_string())?
        .unwrap_or_default();

    if !quiet {
        println!(
            "  {} {} {}",
            "Quest".bold(),
            quest.id,
            format!("({minutes} min {quest_type}, {} {class})", hero.name).dimmed()
        );
        println!();
    }

    let stop_at = match retreat_after {
        Some(secs) => start + Duration::seconds(secs.max(0)),
        None => started.end_at,
    };

    let mut printed = HashSet::new();
    for beat in beats.iter().filter(|b| b.due_at <= stop_at) {
        clock.set(beat.due_at);
        let snapshot = feed
            .recompute(Some(&hero), Some(quest), beat.due_at)
            .await
            .map_err(|e| e.to_string())?;
        if let Some(snapshot) = snapshot
            && !quiet
        {
            print_new(&snapshot.events, &mut printed, start);
        }
    }

    clock.set(stop_at);
    let outcome = match retreat_after {
        Some(_) => Outcome::Retreated(engine.retreat().await.map_err(|e| e.to_string())?),
        None => Outcome::Completed(engine.complete().await.map_err(|e| e.to_string())?),
    };

    let events = store
        .get_quest_events(quest.id)
        .await
        .map_err(|e| e.to_string())?;
    if !quiet {
        print_new(&events, &mut printed, start);
        println!();
    }

    Ok(SimulationReport {
        started,
        events,
        outcome,
    })
}

fn print_new(events: &[QuestEvent], printed: &mut HashSet<i32>, start: DateTime<Utc>) {
    for event in events {
        if !printed.insert(event.idx) {
            continue;
        }
        let at = format!("[{}]", super::offset(start, event.at)).dimmed();
        let message = match &event.outcome {
            _ if event.is_narration_line() => event.message.italic(),
            EventOutcome::Flee { .. } => event.message.yellow(),
            EventOutcome::Win { .. } => event.message.green(),
            EventOutcome::None => event.message.normal(),
        };
        println!("  {at} {message}");
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Completed(summary) => {
            println!(
                "  {} +{} XP, +{} gold",
                "Quest complete".green().bold(),
                summary.loot.xp,
                summary.loot.gold
            );
            if let Some(levels) = summary.leveled_up {
                println!("  {} reached level {} (+{levels})", summary.hero.name, summary.hero.level);
            }
            for id in &summary.new_item_ids {
                let name = fq_core::item::item_by_id(id).map_or_else(|| id.clone(), |item| item.name);
                println!("  {} {name}", "NEW".cyan().bold());
            }
        }
        Outcome::Retreated(summary) => {
            println!("  {}", "Quest abandoned".yellow().bold());
            if summary.cursed {
                println!("  {}", "A curse lingers on your rewards.".red());
            } else {
                println!("  {}", "Left within the grace window, no penalty.".dimmed());
            }
        }
    }
}
