//! Collaborator boundaries for the engine.
//!
//! Storage, hero progression, notifications, status effects and server-side
//! reward validation live behind these traits. The engine only ever talks to
//! `Arc<dyn Trait>`; the [`crate::adapter`] module has in-memory versions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fq_core::{Hero, HeroId, LedgerSnapshot, PlannedEvent, Quest, QuestEvent, QuestId, QuestLoot};

/// Result type for collaborator calls.
pub type PortResult<T> = Result<T, PortError>;

/// Failures reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Quests, their plans, resolved events and ledger snapshots.
#[async_trait]
pub trait QuestStore: Send + Sync {
    async fn insert_quest(&self, quest: &Quest) -> PortResult<()>;
    /// The most recently started quest, terminal or not.
    async fn latest_quest(&self) -> PortResult<Option<Quest>>;
    async fn mark_quest_completed(&self, id: QuestId, end_time: DateTime<Utc>) -> PortResult<()>;
    async fn mark_quest_gave_up(&self, id: QuestId, end_time: DateTime<Utc>) -> PortResult<()>;

    async fn save_quest_plan(&self, id: QuestId, plan: &[PlannedEvent]) -> PortResult<()>;
    async fn get_quest_plan(&self, id: QuestId) -> PortResult<Option<Vec<PlannedEvent>>>;

    async fn append_quest_event(&self, event: &QuestEvent) -> PortResult<()>;
    /// Every persisted event of the quest, in append order.
    async fn get_quest_events(&self, id: QuestId) -> PortResult<Vec<QuestEvent>>;
    /// The latest `n` persisted events, oldest first.
    async fn get_quest_events_preview(&self, id: QuestId, n: usize) -> PortResult<Vec<QuestEvent>>;
    /// Highest beat index resolved so far; narration lines do not count.
    async fn get_last_resolved_event_idx(&self, id: QuestId) -> PortResult<Option<u32>>;
    async fn count_narration_events(&self, id: QuestId) -> PortResult<usize>;

    async fn save_ledger_snapshot(&self, id: QuestId, snapshot: &LedgerSnapshot) -> PortResult<()>;
    async fn get_ledger_snapshot(&self, id: QuestId) -> PortResult<Option<LedgerSnapshot>>;
}

/// Hero progression and inventory.
#[async_trait]
pub trait HeroStore: Send + Sync {
    async fn current_hero(&self) -> PortResult<Option<Hero>>;
    async fn insert_hero(&self, hero: &Hero) -> PortResult<()>;
    async fn update_hero(&self, hero: &Hero) -> PortResult<()>;
    async fn owned_item_ids(&self, hero_id: HeroId) -> PortResult<Vec<String>>;
    /// Grant an item; `false` if the hero already owned it.
    async fn add_item_once(&self, hero_id: HeroId, item_id: &str) -> PortResult<bool>;
}

/// User-facing notifications. Every call is a courtesy; the engine never
/// aborts because one failed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn request_permission_if_needed(&self) -> PortResult<()>;
    async fn show_ongoing(
        &self,
        session_id: QuestId,
        title: &str,
        text: &str,
        end_at: DateTime<Utc>,
    ) -> PortResult<()>;
    async fn clear_ongoing(&self) -> PortResult<()>;
    async fn schedule_end(&self, session_id: QuestId, end_at: DateTime<Utc>) -> PortResult<()>;
    async fn cancel_scheduled_end(&self) -> PortResult<()>;
    async fn show_completed(&self, title: &str, text: &str) -> PortResult<()>;
}

/// Grace window and retreat curse.
#[async_trait]
pub trait StatusEffects: Send + Sync {
    async fn is_in_grace(&self, elapsed_secs: i64) -> PortResult<bool>;
    async fn apply_retreat_curse(&self, now_ms: i64, remaining_ms: i64) -> PortResult<()>;
    /// Lift an active curse; `false` if there was nothing to clear.
    async fn clear_curse(&self, now_ms: i64) -> PortResult<bool>;
    /// Factor applied to rewards earned at `now_ms`, 1.0 when uncursed.
    async fn reward_multiplier(&self, now_ms: i64) -> PortResult<f64>;
}

/// Server-side check of the final loot.
#[async_trait]
pub trait RewardValidator: Send + Sync {
    /// An authoritative replacement for `proposed`, or `None` to keep it.
    async fn validate(&self, quest: &Quest, proposed: &QuestLoot) -> PortResult<Option<QuestLoot>>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
