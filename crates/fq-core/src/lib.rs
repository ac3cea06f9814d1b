//! Core types for Focusquest: heroes, quests, planned beats, and reward ledgers.
//!
//! This crate holds the data model shared by the quest engine and its
//! collaborators. It has no I/O and no randomness of its own; the only
//! computation it owns is seed derivation, which must stay stable across
//! processes.

/// Error types used throughout the crate.
pub mod error;
/// Planned beats and resolved, user-visible quest events.
pub mod event;
/// Hero progression state.
pub mod hero;
/// Quest and hero identifiers.
pub mod id;
/// Items, rarities, and the static item catalog.
pub mod item;
/// Reward ledgers and their persisted snapshots.
pub mod ledger;
/// Reward totals.
pub mod loot;
/// Quest lifecycle entity.
pub mod quest;
/// Deterministic seed derivation.
pub mod seed;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export event types.
pub use event::{EventOutcome, EventType, MobTier, PlannedEvent, QuestEvent};
/// Re-export hero types.
pub use hero::{ClassType, Hero};
/// Re-export identifiers.
pub use id::{HeroId, QuestId};
/// Re-export item types.
pub use item::{Item, Rarity};
/// Re-export ledger types.
pub use ledger::{LEDGER_VERSION, LedgerSnapshot, RewardLedger, RewardLedgerEntry};
/// Re-export loot types.
pub use loot::QuestLoot;
/// Re-export quest types.
pub use quest::{Quest, QuestType};
/// Re-export seed derivation.
pub use seed::derive_seed;
