use fq_core::{ClassType, Hero, LedgerSnapshot, Quest, QuestId, derive_seed};

/// Everything the allocator and the resolver need to know about a quest.
///
/// Both must be fed the same context for a quest, or flee predictions and
/// flavor picks drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestContext {
    pub quest_id: QuestId,
    pub base_seed: u64,
    pub hero_level: u32,
    pub class_type: ClassType,
}

impl QuestContext {
    /// Context for a quest run by the given hero, seeded from the quest.
    pub fn new(quest: &Quest, hero: &Hero) -> Self {
        Self {
            quest_id: quest.id,
            base_seed: derive_seed(quest.start_time, hero.id, quest.id),
            hero_level: hero.level,
            class_type: hero.class_type,
        }
    }

    /// The same quest, with the level and class recorded in a snapshot.
    pub fn with_snapshot(self, snapshot: &LedgerSnapshot) -> Self {
        Self {
            hero_level: snapshot.hero_level,
            class_type: snapshot.class_type,
            ..self
        }
    }
}
