use serde::{Deserialize, Serialize};

use crate::hero::ClassType;
use crate::id::QuestId;

/// Version of the allocation algorithm. Bumped whenever allocation output
/// for the same inputs would change.
pub const LEDGER_VERSION: u32 = 1;

/// Reward assigned to one eligible beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedgerEntry {
    /// Index of the planned beat.
    pub event_idx: u32,
    /// Xp granted, never negative.
    pub xp_delta: i64,
    /// Gold granted, never negative.
    pub gold_delta: i64,
}

/// The deterministic, content-addressed mapping from beat to reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    /// Owning quest.
    pub quest_id: QuestId,
    /// Allocation algorithm version.
    pub version: u32,
    /// Hex digest over the allocation inputs and every entry.
    pub hash: String,
    /// One entry per eligible beat, in idx order.
    pub entries: Vec<RewardLedgerEntry>,
}

impl RewardLedger {
    /// The entry for a beat, if it was eligible.
    pub fn entry_for(&self, idx: u32) -> Option<&RewardLedgerEntry> {
        self.entries.iter().find(|e| e.event_idx == idx)
    }

    /// `(xp, gold)` for a beat, zero when the beat is not in the ledger.
    pub fn deltas_for(&self, idx: u32) -> (i64, i64) {
        self.entry_for(idx)
            .map(|e| (e.xp_delta, e.gold_delta))
            .unwrap_or((0, 0))
    }

    /// Sum of all xp deltas.
    pub fn total_xp(&self) -> i64 {
        self.entries.iter().map(|e| e.xp_delta).sum()
    }

    /// Sum of all gold deltas.
    pub fn total_gold(&self) -> i64 {
        self.entries.iter().map(|e| e.gold_delta).sum()
    }

    /// Whether no beat was eligible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Minimal durable record of a committed ledger.
///
/// Written once at completion. Together with the saved plan it is enough to
/// rebuild the full ledger, and `hash` lets the rebuild be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Allocation algorithm version.
    pub version: u32,
    /// Hash of the committed ledger.
    pub hash: String,
    /// Final xp total that was allocated.
    pub total_xp: i64,
    /// Final gold total that was allocated.
    pub total_gold: i64,
    /// Hero level used for the allocation.
    pub hero_level: u32,
    /// Hero class used for the allocation.
    pub class_type: ClassType,
}

impl LedgerSnapshot {
    /// Snapshot of a ledger allocated from the given totals and context.
    pub fn of(
        ledger: &RewardLedger,
        total_xp: i64,
        total_gold: i64,
        hero_level: u32,
        class_type: ClassType,
    ) -> Self {
        Self {
            version: ledger.version,
            hash: ledger.hash.clone(),
            total_xp,
            total_gold,
            hero_level,
            class_type,
        }
    }
}
