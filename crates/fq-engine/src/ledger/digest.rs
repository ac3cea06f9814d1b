//! Content digests for plans and ledgers.

use sha2::{Digest, Sha256};

use fq_core::{PlannedEvent, RewardLedgerEntry};

use crate::context::QuestContext;

/// Digest of a plan's identity: each beat's type, major flag, index, tier.
///
/// Timestamps are left out; they do not affect allocation.
pub fn plan_digest(plan: &[PlannedEvent]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for beat in plan {
        hasher.update([beat.event_type.code(), u8::from(beat.is_major)]);
        hasher.update(beat.idx.to_le_bytes());
        hasher.update([beat.mob_tier.map(|t| t.code()).unwrap_or(0)]);
    }
    hasher.finalize().into()
}

/// Hex digest of a ledger over its version, context, plan and entries.
pub fn ledger_hash(
    version: u32,
    ctx: &QuestContext,
    plan_digest: &[u8; 32],
    entries: &[RewardLedgerEntry],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(version.to_le_bytes());
    hasher.update(ctx.quest_id.0.as_bytes());
    hasher.update(ctx.base_seed.to_le_bytes());
    hasher.update([ctx.class_type.code()]);
    hasher.update(plan_digest);
    for entry in entries {
        hasher.update(entry.event_idx.to_le_bytes());
        hasher.update(entry.xp_delta.to_le_bytes());
        hasher.update(entry.gold_delta.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
