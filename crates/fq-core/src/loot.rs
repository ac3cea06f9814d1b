use serde::{Deserialize, Serialize};

use crate::item::Item;

/// A reward total: the base roll, or the final amount banked on completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestLoot {
    /// Experience points.
    pub xp: i64,
    /// Gold pieces.
    pub gold: i64,
    /// Dropped items (at most one from the roller).
    pub items: Vec<Item>,
}

impl QuestLoot {
    /// Loot with the given totals and no items.
    pub fn new(xp: i64, gold: i64) -> Self {
        Self {
            xp,
            gold,
            items: Vec::new(),
        }
    }

    /// Whether both totals are non-negative.
    pub fn is_valid(&self) -> bool {
        self.xp >= 0 && self.gold >= 0
    }
}
