//! Free-form narration lines: quest start, loot summary, closers.
//!
//! Unlike beat messages these are not part of the ledger replay, so a deck
//! remembers its recent picks and steers away from repeating them. Each
//! deck is owned by one engine; two engines never share a memory.

use std::collections::{HashMap, VecDeque};

use rand::Rng;
use rand::rngs::StdRng;

use fq_core::QuestType;

/// Re-draws allowed when a pick was used recently.
const MAX_REROLLS: usize = 4;

const START_FOCUS: &[&str] = &[
    "You shoulder your pack and set out.",
    "The gate creaks open. The quest begins.",
    "You tighten your boots. Time to focus.",
    "A quiet road stretches ahead.",
];

const START_STUDY: &[&str] = &[
    "You light a candle and open the old tome.",
    "The library doors close behind you.",
    "Ink, parchment, patience. The study begins.",
];

const START_CHORE: &[&str] = &[
    "You roll up your sleeves. Even heroes sweep floors.",
    "The village needs a hand. You answer.",
    "Broom in hand, you face the dust.",
];

const LOOT: &[&str] = &[
    "Spoils of the journey: +{xp} XP, +{gold} gold.",
    "You count your haul: +{xp} XP, +{gold} gold.",
    "The quest pays off: +{xp} XP, +{gold} gold.",
];

const VICTORY: &[&str] = &[
    "Quest complete. You head home a little stronger.",
    "The road ends here, for today.",
    "Well done. Rest now.",
    "You return to the tavern to tell the tale.",
];

const RETREAT: &[&str] = &[
    "You turn back before the road ends.",
    "Not every quest is finished. You will return.",
    "You slip away into the dusk.",
];

/// Narration category, each with its own pool and memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrationKind {
    Start(QuestType),
    Loot,
    Victory,
    Retreat,
}

impl NarrationKind {
    fn pool(&self) -> &'static [&'static str] {
        match self {
            Self::Start(QuestType::Focus) => START_FOCUS,
            Self::Start(QuestType::Study) => START_STUDY,
            Self::Start(QuestType::Chore) => START_CHORE,
            Self::Loot => LOOT,
            Self::Victory => VICTORY,
            Self::Retreat => RETREAT,
        }
    }
}

/// Fixed-capacity memory of the most recent values.
#[derive(Debug, Clone)]
pub struct RecentRing<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: PartialEq> RecentRing<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Remember a value, forgetting the oldest when full.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Picks narration lines, avoiding recent repeats per category.
#[derive(Debug, Clone)]
pub struct NarrationDeck {
    memory: usize,
    recent: HashMap<NarrationKind, RecentRing<usize>>,
}

impl NarrationDeck {
    /// A deck remembering up to `memory` picks per category.
    pub fn new(memory: usize) -> Self {
        Self {
            memory,
            recent: HashMap::new(),
        }
    }

    /// Pick a line for `kind` from the seeded generator.
    pub fn pick(&mut self, kind: NarrationKind, rng: &mut StdRng) -> &'static str {
        let pool = kind.pool();
        // Leave at least one line free so a re-draw can succeed.
        let capacity = self.memory.min(pool.len().saturating_sub(1));
        let ring = self
            .recent
            .entry(kind)
            .or_insert_with(|| RecentRing::new(capacity));

        let mut choice = rng.random_range(0..pool.len());
        for _ in 0..MAX_REROLLS {
            if !ring.contains(&choice) {
                break;
            }
            choice = rng.random_range(0..pool.len());
        }
        ring.push(choice);
        pool[choice]
    }

    /// Forget every recent pick.
    pub fn reset(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn ring_evicts_oldest() {
        let mut ring = RecentRing::new(2);
        ring.push(1);
        ring.push(2);
        ring.push(3);
        assert!(!ring.contains(&1));
        assert!(ring.contains(&2) && ring.contains(&3));
        assert_eq!(ring.len(), 2);
        ring.clear();
        assert!(ring.is_empty());
    }

    #[test]
    fn zero_capacity_ring_remembers_nothing() {
        let mut ring = RecentRing::new(0);
        ring.push(7);
        assert!(ring.is_empty());
    }

    #[test]
    fn deck_avoids_immediate_repeats_mostly() {
        let mut deck = NarrationDeck::new(2);
        let mut rng = StdRng::seed_from_u64(3);
        let picks: Vec<&str> = (0..30).map(|_| deck.pick(NarrationKind::Victory, &mut rng)).collect();
        let repeats = picks.windows(2).filter(|w| w[0] == w[1]).count();
        assert!(repeats < 5, "too many repeats: {repeats}");
    }

    #[test]
    fn reset_makes_decks_reproducible() {
        let mut deck = NarrationDeck::new(3);
        let first: Vec<&str> = {
            let mut rng = StdRng::seed_from_u64(11);
            (0..5).map(|_| deck.pick(NarrationKind::Loot, &mut rng)).collect()
        };
        deck.reset();
        let second: Vec<&str> = {
            let mut rng = StdRng::seed_from_u64(11);
            (0..5).map(|_| deck.pick(NarrationKind::Loot, &mut rng)).collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn separate_decks_do_not_interfere() {
        let mut a = NarrationDeck::new(3);
        let mut b = NarrationDeck::new(3);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            a.pick(NarrationKind::Retreat, &mut rng);
        }
        let mut rng_b1 = StdRng::seed_from_u64(99);
        let mut rng_b2 = StdRng::seed_from_u64(99);
        let mut fresh = NarrationDeck::new(3);
        assert_eq!(
            b.pick(NarrationKind::Retreat, &mut rng_b1),
            fresh.pick(NarrationKind::Retreat, &mut rng_b2)
        );
    }

    #[test]
    fn start_pool_follows_quest_type() {
        let mut deck = NarrationDeck::new(0);
        let mut rng = StdRng::seed_from_u64(1);
        let line = deck.pick(NarrationKind::Start(QuestType::Study), &mut rng);
        assert!(START_STUDY.contains(&line));
    }
}
