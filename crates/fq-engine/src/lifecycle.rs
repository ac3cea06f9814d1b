//! Start, completion and retreat of a quest.
//!
//! A quest moves `Active -> Completed` or `Active -> GaveUp` exactly once.
//! [`QuestEngine`] holds one lock for both terminal transitions, so a
//! completion racing a retreat queues behind it and then fails its
//! precondition check.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use fq_core::{ClassType, Hero, LedgerSnapshot, Quest, QuestEvent, QuestLoot, QuestType};

use crate::config::EngineConfig;
use crate::context::QuestContext;
use crate::economy::{apply_multiplier, roll_loot};
use crate::error::{EngineError, EngineResult};
use crate::ledger::allocate;
use crate::narration::{NarrationDeck, NarrationKind};
use crate::ports::{
    Clock, HeroStore, Notifier, PortResult, QuestStore, RewardValidator, StatusEffects,
};
use crate::replay::{Due, ensure_plan, replay_due_beats};
use crate::resolver::templates::fill;
use crate::seeding::narration_rng;

const COMPLETED_TITLE: &str = "Quest complete";

/// The ports a [`QuestEngine`] talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub quests: Arc<dyn QuestStore>,
    pub heroes: Arc<dyn HeroStore>,
    pub notifier: Arc<dyn Notifier>,
    pub status: Arc<dyn StatusEffects>,
    pub validator: Arc<dyn RewardValidator>,
    pub clock: Arc<dyn Clock>,
}

/// A freshly started quest.
#[derive(Debug, Clone, Serialize)]
pub struct StartedQuest {
    pub quest: Quest,
    pub end_at: DateTime<Utc>,
}

/// Outcome of a completed quest.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionSummary {
    pub quest: Quest,
    pub hero: Hero,
    pub loot: QuestLoot,
    /// Levels gained, if any.
    pub leveled_up: Option<u32>,
    /// Items the hero did not own before.
    pub new_item_ids: Vec<String>,
}

/// Outcome of an abandoned quest.
#[derive(Debug, Clone, Serialize)]
pub struct RetreatSummary {
    pub quest: Quest,
    /// Whether a reward penalty was applied.
    pub cursed: bool,
}

/// Runs quest transactions against a set of collaborators.
pub struct QuestEngine {
    ports: Collaborators,
    config: EngineConfig,
    terminal: tokio::sync::Mutex<()>,
    deck: Mutex<NarrationDeck>,
}

impl QuestEngine {
    pub fn new(ports: Collaborators, config: EngineConfig) -> Self {
        let deck = NarrationDeck::new(config.narration_memory);
        Self {
            ports,
            config,
            terminal: tokio::sync::Mutex::new(()),
            deck: Mutex::new(deck),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forget recent narration picks.
    pub fn reset_narration(&self) {
        self.deck.lock().unwrap_or_else(PoisonError::into_inner).reset();
    }

    /// Start a quest, creating the hero on first use.
    pub async fn start(
        &self,
        duration_minutes: u32,
        class_type: ClassType,
        quest_type: QuestType,
    ) -> EngineResult<StartedQuest> {
        if duration_minutes == 0 {
            return Err(EngineError::InvalidDuration(duration_minutes));
        }
        if let Some(latest) = self.ports.quests.latest_quest().await?
            && !latest.is_terminal()
        {
            return Err(EngineError::QuestInProgress);
        }

        let hero = match self.ports.heroes.current_hero().await? {
            Some(hero) => hero,
            None => {
                let hero = Hero::new(self.config.hero_name.clone(), class_type);
                self.ports.heroes.insert_hero(&hero).await?;
                log::info!("created hero {} ({})", hero.name, hero.class_type);
                hero
            }
        };

        let now = self.ports.clock.now();
        let quest = Quest::new(hero.id, quest_type, duration_minutes, now);
        self.ports.quests.insert_quest(&quest).await?;
        let ctx = QuestContext::new(&quest, &hero);
        ensure_plan(self.ports.quests.as_ref(), &quest, &ctx).await?;
        let end_at = quest.planned_end();
        log::info!("quest {} started: {} min {}", quest.id, duration_minutes, quest_type);

        let notifier = &self.ports.notifier;
        best_effort("request permission", notifier.request_permission_if_needed().await);
        let line = self
            .narrate(&quest, &ctx, NarrationKind::Start(quest_type), &[])
            .await;
        let text = line.unwrap_or_else(|| format!("{duration_minutes} minute {quest_type} quest"));
        best_effort(
            "show ongoing",
            notifier
                .show_ongoing(quest.id, &self.config.notification_title, &text, end_at)
                .await,
        );
        best_effort("schedule end", notifier.schedule_end(quest.id, end_at).await);

        Ok(StartedQuest { quest, end_at })
    }

    /// Complete the active quest and pay out its rewards.
    ///
    /// Rewards are written before the quest is marked completed. A failed
    /// write leaves the quest active, so calling this again retries it.
    pub async fn complete(&self) -> EngineResult<CompletionSummary> {
        let _guard = self.terminal.lock().await;
        let (mut hero, mut quest) = self.active().await?;
        if quest.completed {
            return Err(EngineError::AlreadyCompleted);
        }

        let now = self.ports.clock.now();
        let ctx = QuestContext::new(&quest, &hero);
        let loot = self.final_loot(&quest, &ctx, now).await;
        let beats = ensure_plan(self.ports.quests.as_ref(), &quest, &ctx).await?;
        let ledger = allocate(&ctx, &beats, &loot);
        let snapshot = LedgerSnapshot::of(&ledger, loot.xp, loot.gold, ctx.hero_level, ctx.class_type);
        self.ports.quests.save_ledger_snapshot(quest.id, &snapshot).await?;
        replay_due_beats(self.ports.quests.as_ref(), &ctx, &beats, &ledger, Due::All).await?;

        let levels = hero.gain_xp(loot.xp);
        hero.gold += loot.gold;
        hero.total_minutes += quest.duration_minutes;
        hero.last_active_at = Some(now);
        self.ports.heroes.update_hero(&hero).await?;

        let mut new_item_ids = Vec::new();
        for item in &loot.items {
            if self.ports.heroes.add_item_once(hero.id, &item.id).await? {
                new_item_ids.push(item.id.clone());
            }
        }

        // Last fatal write: any failure above leaves the quest active for a retry.
        self.ports.quests.mark_quest_completed(quest.id, now).await?;
        quest.completed = true;
        quest.end_time = Some(now);
        log::info!(
            "quest {} completed: +{} xp, +{} gold, {} new items",
            quest.id,
            loot.xp,
            loot.gold,
            new_item_ids.len()
        );

        let values = [("xp", loot.xp.to_string()), ("gold", loot.gold.to_string())];
        let summary = self.narrate(&quest, &ctx, NarrationKind::Loot, &values).await;
        self.narrate(&quest, &ctx, NarrationKind::Victory, &[]).await;

        let notifier = &self.ports.notifier;
        best_effort("cancel scheduled end", notifier.cancel_scheduled_end().await);
        best_effort("clear ongoing", notifier.clear_ongoing().await);
        let text = summary.unwrap_or_else(|| format!("+{} XP, +{} gold", loot.xp, loot.gold));
        best_effort(
            "show completed",
            notifier.show_completed(COMPLETED_TITLE, &text).await,
        );

        Ok(CompletionSummary {
            quest,
            hero,
            loot,
            leveled_up: (levels > 0).then_some(levels),
            new_item_ids,
        })
    }

    /// Abandon the active quest, cursing the hero outside the grace window.
    pub async fn retreat(&self) -> EngineResult<RetreatSummary> {
        let _guard = self.terminal.lock().await;
        let (mut hero, mut quest) = self.active().await?;
        if quest.completed {
            return Err(EngineError::AlreadyCompleted);
        }

        let now = self.ports.clock.now();
        let elapsed_secs = (now - quest.start_time).num_seconds().max(0);
        let remaining_ms = (quest.planned_end() - now).num_milliseconds().max(0);
        let in_grace = self.ports.status.is_in_grace(elapsed_secs).await?;
        let cursed = !in_grace && remaining_ms > 0;
        if cursed {
            self.ports
                .status
                .apply_retreat_curse(now.timestamp_millis(), remaining_ms)
                .await?;
        }

        self.ports.quests.mark_quest_gave_up(quest.id, now).await?;
        quest.gave_up = true;
        quest.end_time = Some(now);
        hero.last_active_at = Some(now);
        self.ports.heroes.update_hero(&hero).await?;
        log::info!("quest {} abandoned after {elapsed_secs}s (cursed: {cursed})", quest.id);

        let notifier = &self.ports.notifier;
        best_effort("cancel scheduled end", notifier.cancel_scheduled_end().await);
        best_effort("clear ongoing", notifier.clear_ongoing().await);
        let ctx = QuestContext::new(&quest, &hero);
        self.narrate(&quest, &ctx, NarrationKind::Retreat, &[]).await;

        Ok(RetreatSummary { quest, cursed })
    }

    /// Pay `cost` gold to lift an active curse.
    ///
    /// Returns `false` without charging when there is no hero, the hero
    /// cannot afford it, or nothing was cursed.
    pub async fn cleanse_curse_with_gold(&self, cost: i64) -> EngineResult<bool> {
        let cost = cost.max(0);
        let Some(mut hero) = self.ports.heroes.current_hero().await? else {
            return Ok(false);
        };
        if hero.gold < cost {
            return Ok(false);
        }
        let now_ms = self.ports.clock.now().timestamp_millis();
        if !self.ports.status.clear_curse(now_ms).await? {
            return Ok(false);
        }
        hero.gold -= cost;
        self.ports.heroes.update_hero(&hero).await?;
        log::info!("curse cleansed for {cost} gold");
        Ok(true)
    }

    /// The latest events of the most recent quest, oldest first.
    pub async fn recent_events(&self) -> EngineResult<Vec<QuestEvent>> {
        let Some(quest) = self.ports.quests.latest_quest().await? else {
            return Ok(Vec::new());
        };
        let events = self
            .ports
            .quests
            .get_quest_events_preview(quest.id, self.config.preview_limit)
            .await?;
        Ok(events)
    }

    /// Hero and latest quest, if the quest has not been abandoned.
    async fn active(&self) -> EngineResult<(Hero, Quest)> {
        let hero = self
            .ports
            .heroes
            .current_hero()
            .await?
            .ok_or(EngineError::NoHero)?;
        let quest = self
            .ports
            .quests
            .latest_quest()
            .await?
            .ok_or(EngineError::NoActiveQuest)?;
        if quest.gave_up {
            return Err(EngineError::NoActiveQuest);
        }
        Ok((hero, quest))
    }

    /// Base loot, scaled by any active curse, then replaced by a valid
    /// server answer if there is one.
    async fn final_loot(&self, quest: &Quest, ctx: &QuestContext, now: DateTime<Utc>) -> QuestLoot {
        let base = roll_loot(quest.duration_minutes, ctx.hero_level, ctx.class_type, ctx.base_seed);
        let factor = match self.ports.status.reward_multiplier(now.timestamp_millis()).await {
            Ok(factor) => factor,
            Err(e) => {
                log::warn!("reward multiplier unavailable: {e}");
                1.0
            }
        };
        let modified = if factor == 1.0 {
            base
        } else {
            apply_multiplier(&base, factor)
        };

        match self.ports.validator.validate(quest, &modified).await {
            Ok(Some(loot)) if loot.is_valid() => {
                log::debug!("reward override for quest {}: {} xp, {} gold", quest.id, loot.xp, loot.gold);
                loot
            }
            Ok(Some(loot)) => {
                log::warn!("ignoring invalid reward override: {} xp, {} gold", loot.xp, loot.gold);
                modified
            }
            Ok(None) => modified,
            Err(e) => {
                log::warn!("reward validation failed: {e}");
                modified
            }
        }
    }

    /// Append a narration line. Failures are logged and yield `None`.
    async fn narrate(
        &self,
        quest: &Quest,
        ctx: &QuestContext,
        kind: NarrationKind,
        values: &[(&str, String)],
    ) -> Option<String> {
        let quests = &self.ports.quests;
        let count = match quests.count_narration_events(quest.id).await {
            Ok(count) => count,
            Err(e) => {
                log::warn!("narration skipped: {e}");
                return None;
            }
        };
        let line = {
            let mut rng = narration_rng(ctx.base_seed, count);
            let mut deck = self.deck.lock().unwrap_or_else(PoisonError::into_inner);
            fill(deck.pick(kind, &mut rng), values)
        };
        let idx = -(i32::try_from(count).unwrap_or(i32::MAX - 1) + 1);
        let event = QuestEvent::narration(quest.id, idx, self.ports.clock.now(), line.clone());
        match quests.append_quest_event(&event).await {
            Ok(()) => Some(line),
            Err(e) => {
                log::warn!("narration not stored: {e}");
                None
            }
        }
    }
}

fn best_effort(what: &str, result: PortResult<()>) {
    if let Err(e) = result {
        log::warn!("{what} failed: {e}");
    }
}
