use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{HeroId, QuestId};

/// What the user is focusing on. Only affects narration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// General deep-work session.
    #[default]
    Focus,
    /// Reading or learning session.
    Study,
    /// Household or errand session.
    Chore,
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focus => write!(f, "Focus"),
            Self::Study => write!(f, "Study"),
            Self::Chore => write!(f, "Chore"),
        }
    }
}

impl FromStr for QuestType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "focus" => Ok(Self::Focus),
            "study" => Ok(Self::Study),
            "chore" => Ok(Self::Chore),
            other => Err(CoreError::UnknownQuestType(other.to_string())),
        }
    }
}

/// A timed quest.
///
/// Created active at start, mutated exactly once by the terminal transition
/// (complete or retreat), immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique quest id.
    pub id: QuestId,
    /// Hero on the quest.
    pub hero_id: HeroId,
    /// Narration flavor.
    pub quest_type: QuestType,
    /// Planned length in minutes.
    pub duration_minutes: u32,
    /// When the quest started.
    pub start_time: DateTime<Utc>,
    /// When the quest ended (completed or abandoned).
    pub end_time: Option<DateTime<Utc>>,
    /// Whether the quest was completed.
    pub completed: bool,
    /// Whether the hero retreated.
    pub gave_up: bool,
}

impl Quest {
    /// Create a new active quest starting at `start_time`.
    pub fn new(
        hero_id: HeroId,
        quest_type: QuestType,
        duration_minutes: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QuestId::new(),
            hero_id,
            quest_type,
            duration_minutes,
            start_time,
            end_time: None,
            completed: false,
            gave_up: false,
        }
    }

    /// The time the quest is scheduled to end.
    pub fn planned_end(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether the quest has completed or been abandoned.
    pub fn is_terminal(&self) -> bool {
        self.completed || self.gave_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn planned_end_adds_duration() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let quest = Quest::new(HeroId::new(), QuestType::Focus, 25, start);
        assert_eq!(quest.planned_end(), Utc.with_ymd_and_hms(2024, 5, 1, 9, 25, 0).unwrap());
        assert!(!quest.is_terminal());
    }

    #[test]
    fn quest_type_parse() {
        assert_eq!("Study".parse::<QuestType>().unwrap(), QuestType::Study);
        assert!("nap".parse::<QuestType>().is_err());
    }
}
