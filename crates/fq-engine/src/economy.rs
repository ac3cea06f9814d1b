//! Base economy roller.
//!
//! Turns a quest's duration, the hero's level and class, and the quest seed
//! into the base reward total. No wall clock, no shared state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fq_core::item::items_of;
use fq_core::{ClassType, QuestLoot, Rarity};

/// Xp earned per focused minute, before multipliers.
pub const XP_PER_MINUTE: f64 = 8.0;
/// Gold is paid per full chunk of this many minutes.
pub const GOLD_CHUNK_MINUTES: u32 = 5;
/// Gold paid per chunk, before multipliers.
pub const GOLD_PER_CHUNK: f64 = 2.0;
/// Multiplicative reward bonus per level above 1.
pub const LEVEL_BONUS: f64 = 0.10;
/// Item drop chance gained per minute.
pub const DROP_CHANCE_PER_MINUTE: f64 = 0.012;
/// Upper bound on the item drop chance.
pub const DROP_CHANCE_CAP: f64 = 0.6;

/// Reward multiplier for a hero level: `1.1^(level - 1)`.
pub fn level_multiplier(level: u32) -> f64 {
    (1.0 + LEVEL_BONUS).powi(level.saturating_sub(1) as i32)
}

/// Chance that a quest of this length drops an item.
pub fn drop_chance(duration_minutes: u32) -> f64 {
    (f64::from(duration_minutes) * DROP_CHANCE_PER_MINUTE).min(DROP_CHANCE_CAP)
}

/// Map a uniform roll in `[0, 1)` to a rarity band the hero has unlocked.
pub fn rarity_for(roll: f64, hero_level: u32) -> Rarity {
    if hero_level >= 10 && roll < 0.03 {
        Rarity::Legendary
    } else if hero_level >= 6 && roll < 0.10 {
        Rarity::Epic
    } else if hero_level >= 3 && roll < 0.30 {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Roll the base reward for a quest.
///
/// Draw order on the seeded stream: drop roll, rarity roll, item pick. The
/// last two happen only when the item drops.
pub fn roll_loot(duration_minutes: u32, hero_level: u32, class_type: ClassType, seed: u64) -> QuestLoot {
    let mut rng = StdRng::seed_from_u64(seed);
    let level_mult = level_multiplier(hero_level);

    let xp = f64::from(duration_minutes) * XP_PER_MINUTE * class_type.xp_multiplier() * level_mult;
    let chunks = duration_minutes / GOLD_CHUNK_MINUTES;
    let gold = f64::from(chunks) * GOLD_PER_CHUNK * class_type.gold_multiplier() * level_mult;

    let mut items = Vec::new();
    let drop_roll: f64 = rng.random();
    if drop_roll < drop_chance(duration_minutes) {
        let rarity = rarity_for(rng.random(), hero_level);
        let pool = items_of(rarity);
        if !pool.is_empty() {
            items.push(pool[rng.random_range(0..pool.len())].clone());
        }
    }

    QuestLoot {
        xp: round_non_negative(xp),
        gold: round_non_negative(gold),
        items,
    }
}

/// Scale a reward's xp and gold, e.g. for a reward penalty. Items are kept.
pub fn apply_multiplier(loot: &QuestLoot, factor: f64) -> QuestLoot {
    let factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
    QuestLoot {
        xp: round_non_negative(loot.xp as f64 * factor),
        gold: round_non_negative(loot.gold as f64 * factor),
        items: loot.items.clone(),
    }
}

fn round_non_negative(value: f64) -> i64 {
    value.round().max(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let a = roll_loot(25, 3, ClassType::Warrior, 42);
        let b = roll_loot(25, 3, ClassType::Warrior, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn base_amounts_for_level_one_warrior() {
        let loot = roll_loot(25, 1, ClassType::Warrior, 1);
        // 25 * 8 * 1.05 = 210, 5 chunks * 2 = 10
        assert_eq!(loot.xp, 210);
        assert_eq!(loot.gold, 10);
    }

    #[test]
    fn level_scales_rewards() {
        let low = roll_loot(30, 1, ClassType::Mage, 7);
        let high = roll_loot(30, 5, ClassType::Mage, 7);
        assert!(high.xp > low.xp);
        assert!(high.gold >= low.gold);
        assert!((level_multiplier(3) - 1.21).abs() < 1e-9);
    }

    #[test]
    fn gold_paid_in_whole_chunks() {
        let loot = roll_loot(4, 1, ClassType::Warrior, 3);
        assert_eq!(loot.gold, 0);
        let loot = roll_loot(9, 1, ClassType::Warrior, 3);
        assert_eq!(loot.gold, 2);
    }

    #[test]
    fn zero_duration_gives_nothing() {
        let loot = roll_loot(0, 4, ClassType::Rogue, 11);
        assert_eq!(loot, QuestLoot::default());
    }

    #[test]
    fn drop_chance_is_capped() {
        assert!((drop_chance(10) - 0.12).abs() < 1e-9);
        assert!((drop_chance(500) - DROP_CHANCE_CAP).abs() < 1e-9);
    }

    #[test]
    fn rarity_gated_by_level() {
        assert_eq!(rarity_for(0.01, 1), Rarity::Common);
        assert_eq!(rarity_for(0.01, 3), Rarity::Rare);
        assert_eq!(rarity_for(0.01, 6), Rarity::Epic);
        assert_eq!(rarity_for(0.01, 10), Rarity::Legendary);
        assert_eq!(rarity_for(0.5, 10), Rarity::Common);
    }

    #[test]
    fn at_most_one_item_and_within_band() {
        for seed in 0..200 {
            let loot = roll_loot(60, 2, ClassType::Rogue, seed);
            assert!(loot.items.len() <= 1);
            for item in &loot.items {
                assert_eq!(item.rarity, Rarity::Common);
            }
        }
    }

    #[test]
    fn long_quests_drop_items_sometimes() {
        let drops = (0..200)
            .filter(|s| !roll_loot(90, 4, ClassType::Warrior, *s).items.is_empty())
            .count();
        assert!(drops > 50 && drops < 200);
    }

    #[test]
    fn multiplier_halves_and_clamps() {
        let loot = QuestLoot::new(101, 9);
        let half = apply_multiplier(&loot, 0.5);
        assert_eq!(half.xp, 51);
        assert_eq!(half.gold, 5);
        assert_eq!(apply_multiplier(&loot, -3.0), QuestLoot::new(0, 0));
        assert_eq!(apply_multiplier(&loot, f64::NAN), loot);
    }
}
