use std::fmt;

use serde::{Deserialize, Serialize};

/// Item rarity band. Higher bands unlock with hero level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Always available.
    Common,
    /// Unlocks at level 3.
    Rare,
    /// Unlocks at level 6.
    Epic,
    /// Unlocks at level 10.
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "Common"),
            Self::Rare => write!(f, "Rare"),
            Self::Epic => write!(f, "Epic"),
            Self::Legendary => write!(f, "Legendary"),
        }
    }
}

/// A collectible item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Stable catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rarity band.
    pub rarity: Rarity,
}

impl Item {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.0.to_string(),
            name: entry.1.to_string(),
            rarity: entry.2,
        }
    }
}

/// Catalog row: `(id, name, rarity)`.
pub type CatalogEntry = (&'static str, &'static str, Rarity);

/// Every item that can drop from a quest.
pub const ITEM_CATALOG: &[CatalogEntry] = &[
    ("cmn_candle", "Stubby Candle", Rarity::Common),
    ("cmn_quill", "Worn Quill", Rarity::Common),
    ("cmn_rope", "Coil of Rope", Rarity::Common),
    ("cmn_bread", "Travel Bread", Rarity::Common),
    ("cmn_pebble", "Lucky Pebble", Rarity::Common),
    ("rare_lantern", "Hooded Lantern", Rarity::Rare),
    ("rare_compass", "Brass Compass", Rarity::Rare),
    ("rare_cloak", "Moth-Eaten Cloak", Rarity::Rare),
    ("rare_dagger", "Silvered Dagger", Rarity::Rare),
    ("epic_hourglass", "Hourglass of Patience", Rarity::Epic),
    ("epic_tome", "Tome of Quiet Hours", Rarity::Epic),
    ("epic_ring", "Ring of Steady Hands", Rarity::Epic),
    ("leg_crown", "Crown of Unbroken Focus", Rarity::Legendary),
    ("leg_blade", "Blade of the Last Minute", Rarity::Legendary),
];

/// All catalog items of the given rarity, in catalog order.
pub fn items_of(rarity: Rarity) -> Vec<Item> {
    ITEM_CATALOG
        .iter()
        .filter(|e| e.2 == rarity)
        .map(Item::from_entry)
        .collect()
}

/// Look up an item by catalog id.
pub fn item_by_id(id: &str) -> Option<Item> {
    ITEM_CATALOG
        .iter()
        .find(|e| e.0 == id)
        .map(Item::from_entry)
}
