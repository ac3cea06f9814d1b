//! Deterministic quest simulation and reward-ledger engine.
//!
//! The pure leaves ([`economy`], [`planner`], [`ledger`], [`resolver`]) turn a
//! quest seed into a plan of timed beats, a reward total, an immutable ledger
//! distributing that total, and narrated events. [`lifecycle::QuestEngine`]
//! wires them to the storage, hero, notification and status-effect ports, and
//! [`feed::FeedReplayer`] turns a ticking clock into a live preview that
//! converges on the committed ledger.

/// In-memory and recording adapters for the collaborator ports.
pub mod adapter;
/// Runtime knobs for the engine.
pub mod config;
/// Per-quest allocation and resolution context.
pub mod context;
/// Base economy roller.
pub mod economy;
/// Mob encounter rolls shared by the allocator and the resolver.
pub mod encounter;
/// Error types for the engine.
pub mod error;
/// Live feed replayer and its tick-driven pipeline.
pub mod feed;
/// Reward allocator and ledger hashing.
pub mod ledger;
/// Quest lifecycle orchestrator.
pub mod lifecycle;
/// Free-form narration lines with recent-pick memory.
pub mod narration;
/// Session planner.
pub mod planner;
/// Collaborator port traits.
pub mod ports;
/// Replaying due beats into persisted events.
pub mod replay;
/// Event resolver.
pub mod resolver;
/// Sub-seed derivation and weighted draws.
pub mod seeding;

pub use config::EngineConfig;
pub use context::QuestContext;
pub use error::{EngineError, EngineResult};
pub use feed::{FeedHandle, FeedReplayer, FeedSnapshot, spawn_feed};
pub use ledger::{allocate, reconstruct};
pub use lifecycle::{Collaborators, CompletionSummary, QuestEngine, RetreatSummary, StartedQuest};
pub use planner::{PlanSpec, plan};
pub use resolver::resolve_from_ledger;
