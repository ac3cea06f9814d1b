use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::QuestId;

/// Kind of narrative beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// An encounter with a monster: xp and gold.
    Mob,
    /// A chest: gold only.
    Chest,
    /// An odd little happening: xp only.
    Quirky,
    /// A trinket found along the way: flavor only.
    Trinket,
    /// Free-form narration: flavor only, never planned.
    Narration,
}

impl EventType {
    /// Stable numeric code, used when hashing plans.
    pub fn code(&self) -> u8 {
        match self {
            Self::Mob => 0,
            Self::Chest => 1,
            Self::Quirky => 2,
            Self::Trinket => 3,
            Self::Narration => 4,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mob => write!(f, "Mob"),
            Self::Chest => write!(f, "Chest"),
            Self::Quirky => write!(f, "Quirky"),
            Self::Trinket => write!(f, "Trinket"),
            Self::Narration => write!(f, "Narration"),
        }
    }
}

/// Difficulty band of a mob encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobTier {
    /// Weak mobs, usually below the hero's level.
    Light,
    /// Even fights.
    Mid,
    /// Dangerous mobs, often above the hero's level.
    Rare,
}

impl MobTier {
    /// Stable numeric code, used when hashing plans.
    pub fn code(&self) -> u8 {
        match self {
            Self::Light => 1,
            Self::Mid => 2,
            Self::Rare => 3,
        }
    }
}

impl fmt::Display for MobTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "Light"),
            Self::Mid => write!(f, "Mid"),
            Self::Rare => write!(f, "Rare"),
        }
    }
}

/// One planned, timed beat of a quest.
///
/// `idx` is the stable identity and sort key. Plans are immutable once saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEvent {
    /// Owning quest.
    pub quest_id: QuestId,
    /// Position in the plan, starting at 0.
    pub idx: u32,
    /// When the beat becomes visible.
    pub due_at: DateTime<Utc>,
    /// Beat kind.
    pub event_type: EventType,
    /// Whether this beat carries one of the session's primary encounters.
    pub is_major: bool,
    /// Tier, present only for mob beats.
    pub mob_tier: Option<MobTier>,
}

/// How a resolved beat turned out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOutcome {
    /// No encounter.
    #[default]
    None,
    /// The hero beat a mob.
    Win {
        /// Mob name.
        name: String,
        /// Mob level.
        level: u32,
    },
    /// The hero retreated from a mob that was too strong.
    Flee {
        /// Mob name.
        name: String,
        /// Mob level.
        level: u32,
    },
}

/// A resolved, user-visible entry in the quest feed.
///
/// Non-negative `idx` values mirror planned beats; negative values are
/// free-form narration lines (start, loot, closer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestEvent {
    /// Owning quest.
    pub quest_id: QuestId,
    /// Beat index, or a negative narration index.
    pub idx: i32,
    /// When the event happened.
    pub at: DateTime<Utc>,
    /// Event kind.
    pub event_type: EventType,
    /// Narrated text.
    pub message: String,
    /// Xp granted by this event.
    pub xp_delta: i64,
    /// Gold granted by this event.
    pub gold_delta: i64,
    /// Encounter result.
    pub outcome: EventOutcome,
}

impl QuestEvent {
    /// A narration line with no reward.
    pub fn narration(quest_id: QuestId, idx: i32, at: DateTime<Utc>, message: String) -> Self {
        Self {
            quest_id,
            idx,
            at,
            event_type: EventType::Narration,
            message,
            xp_delta: 0,
            gold_delta: 0,
            outcome: EventOutcome::None,
        }
    }

    /// Whether this event is a free-form narration line rather than a beat.
    pub fn is_narration_line(&self) -> bool {
        self.idx < 0
    }
}
