use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::HeroId;

/// A hero's class. Each class scales quest rewards differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    /// Balanced fighter with a slight xp bonus.
    Warrior,
    /// Scholar: more xp, less gold.
    Mage,
    /// Treasure hunter: more gold, less xp.
    Rogue,
}

impl ClassType {
    /// All classes in a stable order.
    pub const ALL: [ClassType; 3] = [Self::Warrior, Self::Mage, Self::Rogue];

    /// Multiplier applied to base xp.
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            Self::Warrior => 1.05,
            Self::Mage => 1.15,
            Self::Rogue => 0.95,
        }
    }

    /// Multiplier applied to base gold.
    pub fn gold_multiplier(&self) -> f64 {
        match self {
            Self::Warrior => 1.0,
            Self::Mage => 0.9,
            Self::Rogue => 1.2,
        }
    }

    /// Stable numeric code, used when hashing ledgers.
    pub fn code(&self) -> u8 {
        match self {
            Self::Warrior => 0,
            Self::Mage => 1,
            Self::Rogue => 2,
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warrior => write!(f, "Warrior"),
            Self::Mage => write!(f, "Mage"),
            Self::Rogue => write!(f, "Rogue"),
        }
    }
}

impl FromStr for ClassType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warrior" => Ok(Self::Warrior),
            "mage" => Ok(Self::Mage),
            "rogue" => Ok(Self::Rogue),
            other => Err(CoreError::UnknownClass(other.to_string())),
        }
    }
}

/// The player's persistent avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Unique hero id.
    pub id: HeroId,
    /// Display name.
    pub name: String,
    /// Class chosen at creation.
    pub class_type: ClassType,
    /// Current level, starting at 1.
    pub level: u32,
    /// Xp accumulated towards the next level.
    pub xp: i64,
    /// Gold on hand.
    pub gold: i64,
    /// Total minutes of completed quests.
    pub total_minutes: u32,
    /// Last time the hero finished or abandoned a quest.
    pub last_active_at: Option<DateTime<Utc>>,
}

impl Hero {
    /// Create a level 1 hero with no xp or gold.
    pub fn new(name: impl Into<String>, class_type: ClassType) -> Self {
        Self {
            id: HeroId::new(),
            name: name.into(),
            class_type,
            level: 1,
            xp: 0,
            gold: 0,
            total_minutes: 0,
            last_active_at: None,
        }
    }

    /// Xp required to advance from the current level.
    pub fn xp_to_next_level(&self) -> i64 {
        100 * i64::from(self.level.max(1))
    }

    /// Add xp, levelling up while the threshold is met. Returns levels gained.
    pub fn gain_xp(&mut self, xp: i64) -> u32 {
        self.xp += xp.max(0);
        let mut gained = 0;
        while self.xp >= self.xp_to_next_level() {
            self.xp -= self.xp_to_next_level();
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_hero_starts_at_level_one() {
        let hero = Hero::new("Ada", ClassType::Mage);
        assert_eq!(hero.level, 1);
        assert_eq!(hero.xp, 0);
        assert_eq!(hero.xp_to_next_level(), 100);
    }

    #[test]
    fn gain_xp_carries_overflow() {
        let mut hero = Hero::new("Ada", ClassType::Warrior);
        let gained = hero.gain_xp(350);
        // 100 for level 1 -> 2, 200 for 2 -> 3, 50 left over
        assert_eq!(gained, 2);
        assert_eq!(hero.level, 3);
        assert_eq!(hero.xp, 50);
    }

    #[test]
    fn gain_xp_ignores_negative() {
        let mut hero = Hero::new("Ada", ClassType::Rogue);
        assert_eq!(hero.gain_xp(-40), 0);
        assert_eq!(hero.xp, 0);
    }

    #[test]
    fn class_parse_and_display() {
        assert_eq!("WARRIOR".parse::<ClassType>().unwrap(), ClassType::Warrior);
        assert_eq!(" mage ".parse::<ClassType>().unwrap(), ClassType::Mage);
        assert!("bard".parse::<ClassType>().is_err());
        assert_eq!(ClassType::Rogue.to_string(), "Rogue");
    }

    #[test]
    fn class_codes_are_distinct() {
        let codes: std::collections::HashSet<u8> =
            ClassType::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), ClassType::ALL.len());
    }
}
