//! Reward allocator.
//!
//! Distributes a final reward total across a quest's planned beats. Each beat
//! gets an xp weight and a gold weight from its type and its own generator;
//! totals are split by largest remainder so the ledger always sums to the
//! total exactly. Same inputs, same ledger, same hash.

pub mod digest;
pub mod split;

use rand::Rng;
use rand::rngs::StdRng;

use fq_core::{
    EventType, LEDGER_VERSION, LedgerSnapshot, MobTier, PlannedEvent, QuestLoot, RewardLedger,
    RewardLedgerEntry,
};

use crate::context::QuestContext;
use crate::encounter::roll_encounter;
use crate::error::{EngineError, EngineResult};
use crate::seeding::beat_rng;

use digest::{ledger_hash, plan_digest};
use split::largest_remainder;

/// Jitter applied to every weight, as `[1 - J, 1 + J]`.
pub const WEIGHT_JITTER: f64 = 0.15;
/// Fraction of xp weight a fleeing mob keeps.
pub const FLEE_XP_FRACTION: f64 = 0.35;

const CHEST_GOLD_MAJOR: f64 = 3.0;
const CHEST_GOLD_MINOR: f64 = 1.5;
const QUIRKY_XP: f64 = 1.0;
const MAJOR_MOB_XP_BONUS: f64 = 1.5;

fn mob_xp_weight(tier: MobTier) -> f64 {
    match tier {
        MobTier::Light => 1.0,
        MobTier::Mid => 1.8,
        MobTier::Rare => 3.0,
    }
}

fn mob_gold_weight(tier: MobTier) -> f64 {
    match tier {
        MobTier::Light => 0.6,
        MobTier::Mid => 1.0,
        MobTier::Rare => 1.6,
    }
}

/// A beat's share weights, before the split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatWeights {
    pub idx: u32,
    pub xp: f64,
    pub gold: f64,
    pub flees: bool,
}

impl BeatWeights {
    pub fn is_eligible(&self) -> bool {
        self.xp > 0.0 || self.gold > 0.0
    }
}

fn draw_jitters(rng: &mut StdRng) -> (f64, f64) {
    let xp = rng.random_range(1.0 - WEIGHT_JITTER..=1.0 + WEIGHT_JITTER);
    let gold = rng.random_range(1.0 - WEIGHT_JITTER..=1.0 + WEIGHT_JITTER);
    (xp, gold)
}

/// Weights for one beat. Mob beats roll their encounter before the jitters.
pub fn beat_weights(ctx: &QuestContext, beat: &PlannedEvent, has_gold: bool) -> BeatWeights {
    let mut rng = beat_rng(ctx.base_seed, beat.idx);

    let (xp, gold, flees) = match beat.event_type {
        EventType::Mob => {
            let tier = beat.mob_tier.unwrap_or(MobTier::Light);
            let encounter = roll_encounter(&mut rng, tier, ctx.hero_level);
            let (xp_j, gold_j) = draw_jitters(&mut rng);
            let bonus = if beat.is_major { MAJOR_MOB_XP_BONUS } else { 1.0 };
            let xp = mob_xp_weight(tier) * bonus * xp_j;
            if encounter.flees {
                (xp * FLEE_XP_FRACTION, 0.0, true)
            } else {
                (xp, mob_gold_weight(tier) * gold_j, false)
            }
        }
        EventType::Chest => {
            let (_, gold_j) = draw_jitters(&mut rng);
            let base = if beat.is_major {
                CHEST_GOLD_MAJOR
            } else {
                CHEST_GOLD_MINOR
            };
            let gold = if has_gold { base * gold_j } else { 0.0 };
            (0.0, gold, false)
        }
        EventType::Quirky => {
            let (xp_j, _) = draw_jitters(&mut rng);
            (QUIRKY_XP * xp_j, 0.0, false)
        }
        EventType::Trinket | EventType::Narration => (0.0, 0.0, false),
    };

    BeatWeights {
        idx: beat.idx,
        xp,
        gold,
        flees,
    }
}

/// Allocate `totals` across `plan` into an immutable ledger.
///
/// Negative totals count as zero. Beats with no weight on either axis get no
/// entry; if no beat is eligible the ledger is empty.
pub fn allocate(ctx: &QuestContext, plan: &[PlannedEvent], totals: &QuestLoot) -> RewardLedger {
    let mut beats: Vec<&PlannedEvent> = plan.iter().collect();
    beats.sort_by_key(|b| b.idx);

    let total_xp = totals.xp.max(0);
    let total_gold = totals.gold.max(0);

    let weights: Vec<BeatWeights> = beats
        .iter()
        .map(|b| beat_weights(ctx, b, total_gold > 0))
        .collect();

    let xp_weights: Vec<f64> = weights.iter().map(|w| w.xp).collect();
    let gold_weights: Vec<f64> = weights.iter().map(|w| w.gold).collect();
    let xp_shares = largest_remainder(total_xp, &xp_weights);
    let gold_shares = largest_remainder(total_gold, &gold_weights);

    let entries: Vec<RewardLedgerEntry> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_eligible())
        .map(|(i, w)| RewardLedgerEntry {
            event_idx: w.idx,
            xp_delta: xp_shares[i],
            gold_delta: if w.flees { 0 } else { gold_shares[i] },
        })
        .collect();

    let sorted: Vec<PlannedEvent> = beats.into_iter().cloned().collect();
    let hash = ledger_hash(LEDGER_VERSION, ctx, &plan_digest(&sorted), &entries);

    log::debug!(
        "allocated {} xp / {} gold over {} entries for quest {} ({})",
        total_xp,
        total_gold,
        entries.len(),
        ctx.quest_id,
        &hash[..12]
    );

    RewardLedger {
        quest_id: ctx.quest_id,
        version: LEDGER_VERSION,
        hash,
        entries,
    }
}

/// Rebuild a committed ledger from its snapshot and check it.
///
/// `ctx` should already carry the snapshot's level and class
/// (see [`QuestContext::with_snapshot`]).
pub fn reconstruct(
    ctx: &QuestContext,
    plan: &[PlannedEvent],
    snapshot: &LedgerSnapshot,
) -> EngineResult<RewardLedger> {
    if snapshot.version != LEDGER_VERSION {
        return Err(EngineError::UnsupportedLedgerVersion {
            expected: LEDGER_VERSION,
            found: snapshot.version,
        });
    }
    let totals = QuestLoot::new(snapshot.total_xp, snapshot.total_gold);
    let ledger = allocate(ctx, plan, &totals);
    if ledger.hash != snapshot.hash {
        return Err(EngineError::LedgerMismatch {
            expected: snapshot.hash.clone(),
            found: ledger.hash,
        });
    }
    Ok(ledger)
}
