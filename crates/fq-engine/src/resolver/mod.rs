//! Event resolver.
//!
//! Renders a planned beat and its ledger deltas into a narrated event. The
//! encounter is re-rolled on the beat's own generator, exactly as the
//! allocator rolled it, and templates come from a separate flavor stream.
//! Nothing here holds state, so resolving a beat twice gives the same event.

pub mod templates;

use fq_core::{EventOutcome, EventType, MobTier, PlannedEvent, QuestEvent};

use crate::context::QuestContext;
use crate::encounter::roll_encounter;
use crate::seeding::{beat_rng, flavor_rng};

use templates::{fill, pick};

/// Resolve one planned beat into a user-visible event.
pub fn resolve_from_ledger(
    ctx: &QuestContext,
    beat: &PlannedEvent,
    xp_delta: i64,
    gold_delta: i64,
) -> QuestEvent {
    let mut flavor = flavor_rng(ctx.base_seed, beat.idx);
    let xp = xp_delta.max(0);
    let gold = gold_delta.max(0);

    let (message, xp_delta, gold_delta, outcome) = match beat.event_type {
        EventType::Mob => {
            let tier = beat.mob_tier.unwrap_or(MobTier::Light);
            let mut rng = beat_rng(ctx.base_seed, beat.idx);
            let enc = roll_encounter(&mut rng, tier, ctx.hero_level);
            let name = enc.name.to_string();
            if enc.flees {
                let message = fill(templates::MOB_FLEE, &[
                    ("mob", name.clone()),
                    ("level", enc.level.to_string()),
                    ("xp", xp.to_string()),
                ]);
                (message, xp, 0, EventOutcome::Flee {
                    name,
                    level: enc.level,
                })
            } else {
                let message = fill(pick(&mut flavor, templates::MOB_WIN), &[
                    ("mob", name.clone()),
                    ("level", enc.level.to_string()),
                    ("xp", xp.to_string()),
                    ("gold", gold.to_string()),
                ]);
                (message, xp, gold, EventOutcome::Win {
                    name,
                    level: enc.level,
                })
            }
        }
        EventType::Chest => {
            let pool = if gold == 0 {
                templates::CHEST_EMPTY
            } else if beat.is_major {
                templates::CHEST_RICH
            } else {
                templates::CHEST_PLAIN
            };
            let message = fill(pick(&mut flavor, pool), &[("gold", gold.to_string())]);
            (message, 0, gold, EventOutcome::None)
        }
        EventType::Quirky => {
            let message = fill(pick(&mut flavor, templates::QUIRKY), &[("xp", xp.to_string())]);
            (message, xp, 0, EventOutcome::None)
        }
        EventType::Trinket => (
            pick(&mut flavor, templates::TRINKET).to_string(),
            0,
            0,
            EventOutcome::None,
        ),
        EventType::Narration => (
            pick(&mut flavor, templates::AMBIENT).to_string(),
            0,
            0,
            EventOutcome::None,
        ),
    };

    QuestEvent {
        quest_id: ctx.quest_id,
        idx: beat.idx as i32,
        at: beat.due_at,
        event_type: beat.event_type,
        message,
        xp_delta,
        gold_delta,
        outcome,
    }
}
