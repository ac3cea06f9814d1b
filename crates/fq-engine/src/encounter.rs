//! Mob encounters.
//!
//! The allocator predicts flee outcomes and the resolver narrates them; both
//! call [`roll_encounter`] on the beat's own generator, first, so their views
//! of a fight are bit-identical.

use rand::Rng;
use rand::rngs::StdRng;

use fq_core::MobTier;

/// A mob more than this many levels above the hero may make the hero flee.
pub const FLEE_LEVEL_DELTA: u32 = 2;

/// Chance to flee from a mob that is too strong.
pub const FLEE_CHANCE: f64 = 0.6;

const LIGHT_MOBS: &[&str] = &[
    "Giant Rat",
    "Mossy Slime",
    "Cave Bat",
    "Goblin Scout",
    "Grumpy Mushroom",
    "Feral Chicken",
];

const MID_MOBS: &[&str] = &[
    "Orc Brawler",
    "Skeleton Guard",
    "Bandit Captain",
    "Dire Wolf",
    "Bog Witch",
];

const RARE_MOBS: &[&str] = &[
    "Cave Troll",
    "Wyvern",
    "Lich Apprentice",
    "Iron Golem",
    "Shadow Stalker",
];

/// Name pool for a tier.
pub fn names_for(tier: MobTier) -> &'static [&'static str] {
    match tier {
        MobTier::Light => LIGHT_MOBS,
        MobTier::Mid => MID_MOBS,
        MobTier::Rare => RARE_MOBS,
    }
}

/// Inclusive range of mob level offsets from the hero's level.
pub fn level_spread(tier: MobTier) -> (i64, i64) {
    match tier {
        MobTier::Light => (-2, 1),
        MobTier::Mid => (-1, 3),
        MobTier::Rare => (2, 6),
    }
}

/// The mob a beat puts in front of the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobEncounter {
    pub name: &'static str,
    pub level: u32,
    pub flees: bool,
}

/// Roll a mob: name, level, then the flee roll. Always three draws.
pub fn roll_encounter(rng: &mut StdRng, tier: MobTier, hero_level: u32) -> MobEncounter {
    let pool = names_for(tier);
    let name = pool[rng.random_range(0..pool.len())];

    let (lo, hi) = level_spread(tier);
    let offset: i64 = rng.random_range(lo..=hi);
    let level = (i64::from(hero_level) + offset).max(1) as u32;

    let flee_roll: f64 = rng.random();
    let too_strong = level > hero_level.saturating_add(FLEE_LEVEL_DELTA);

    MobEncounter {
        name,
        level,
        flees: too_strong && flee_roll < FLEE_CHANCE,
    }
}
