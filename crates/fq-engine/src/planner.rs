//! Session planner.
//!
//! Turns a quest's duration and seed into an ordered list of timed beats.
//! All randomness comes from one generator seeded with [`PlanSpec::seed`],
//! consumed in a fixed order: beat count, every timestamp jitter, then type
//! and tier per beat.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fq_core::{ClassType, EventType, MobTier, PlannedEvent, QuestId};

use crate::seeding::pick_weighted;

/// Hard minimum gap between consecutive beats, in milliseconds.
pub const MIN_BEAT_SPACING_MS: i64 = 30_000;
/// Lower clamp for a jittered interval before spacing is enforced.
pub const INTERVAL_FLOOR_MS: i64 = 15_000;
/// Interval jitter as a fraction of the base interval.
pub const INTERVAL_JITTER: f64 = 0.2;

const MAJOR_TYPE_ODDS: &[(EventType, u32)] = &[
    (EventType::Mob, 70),
    (EventType::Chest, 20),
    (EventType::Quirky, 10),
];

const MINOR_TYPE_ODDS: &[(EventType, u32)] = &[
    (EventType::Mob, 25),
    (EventType::Chest, 30),
    (EventType::Quirky, 25),
    (EventType::Trinket, 20),
];

/// Inputs for planning one session.
#[derive(Debug, Clone)]
pub struct PlanSpec {
    pub quest_id: QuestId,
    pub duration_minutes: u32,
    pub seed: u64,
    pub start_at: DateTime<Utc>,
    pub hero_level: u32,
    pub class_type: ClassType,
}

/// Duration bands with fixed beat counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationTier {
    /// Up to 15 minutes.
    Short,
    /// Up to 30 minutes.
    Medium,
    /// Up to 60 minutes.
    Long,
    /// Anything longer.
    Extended,
}

impl DurationTier {
    pub fn from_minutes(minutes: u32) -> Self {
        match minutes {
            0..=15 => Self::Short,
            16..=30 => Self::Medium,
            31..=60 => Self::Long,
            _ => Self::Extended,
        }
    }

    /// Beat count. Only the extended tier draws from the generator.
    fn beat_count(&self, rng: &mut StdRng) -> usize {
        match self {
            Self::Short => 4,
            Self::Medium => 7,
            Self::Long => 10,
            Self::Extended => rng.random_range(12..=15),
        }
    }

    fn major_count(&self) -> usize {
        match self {
            Self::Short => 1,
            Self::Medium => 2,
            Self::Long => 3,
            Self::Extended => 4,
        }
    }

    fn tier_odds(&self) -> &'static [(MobTier, u32)] {
        match self {
            Self::Short => &[(MobTier::Light, 70), (MobTier::Mid, 25), (MobTier::Rare, 5)],
            Self::Medium => &[(MobTier::Light, 55), (MobTier::Mid, 35), (MobTier::Rare, 10)],
            Self::Long => &[(MobTier::Light, 45), (MobTier::Mid, 40), (MobTier::Rare, 15)],
            Self::Extended => &[(MobTier::Light, 35), (MobTier::Mid, 45), (MobTier::Rare, 20)],
        }
    }

    /// Medium and long sessions always get one mid-weight fight.
    fn forces_first_mid(&self) -> bool {
        matches!(self, Self::Medium | Self::Long)
    }
}

/// Indices of the major beats, spread evenly over `count` beats.
pub fn major_positions(count: usize, majors: usize) -> Vec<usize> {
    let majors = majors.min(count);
    (1..=majors).map(|k| k * count / (majors + 1)).collect()
}

/// Plan a session. The same spec always yields the same plan.
///
/// Spacing wins over the session end: a one-minute session still gets four
/// beats [`MIN_BEAT_SPACING_MS`] apart, so its later beats fall due after the
/// planned end and only surface when the quest completes.
pub fn plan(spec: &PlanSpec) -> Vec<PlannedEvent> {
    if spec.duration_minutes == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let tier = DurationTier::from_minutes(spec.duration_minutes);
    let count = tier.beat_count(&mut rng);
    let majors = major_positions(count, tier.major_count());

    let due = beat_times(&mut rng, spec, count);

    let mut seen_mob = false;
    let mut beats = Vec::with_capacity(count);
    for (i, due_at) in due.into_iter().enumerate() {
        let is_major = majors.contains(&i);
        let odds = if is_major { MAJOR_TYPE_ODDS } else { MINOR_TYPE_ODDS };
        let event_type = pick_weighted(&mut rng, odds).unwrap_or(EventType::Chest);

        let mob_tier = if event_type == EventType::Mob {
            // The draw is consumed even when overridden, to keep later beats stable.
            let drawn = pick_weighted(&mut rng, tier.tier_odds()).unwrap_or(MobTier::Light);
            let forced = tier.forces_first_mid() && !seen_mob;
            seen_mob = true;
            Some(if forced { MobTier::Mid } else { drawn })
        } else {
            None
        };

        beats.push(PlannedEvent {
            quest_id: spec.quest_id,
            idx: i as u32,
            due_at,
            event_type,
            is_major,
            mob_tier,
        });
    }

    log::debug!(
        "planned {} beats ({} major) for quest {}",
        beats.len(),
        majors.len(),
        spec.quest_id
    );
    beats
}

fn beat_times(rng: &mut StdRng, spec: &PlanSpec, count: usize) -> Vec<DateTime<Utc>> {
    let duration_ms = i64::from(spec.duration_minutes) * 60_000;
    let base_ms = duration_ms / (count as i64 + 1);
    let jitter_ms = (base_ms as f64 * INTERVAL_JITTER) as i64;

    let mut times = Vec::with_capacity(count);
    let mut prev = spec.start_at;
    for _ in 0..count {
        let jitter = if jitter_ms > 0 {
            rng.random_range(-jitter_ms..=jitter_ms)
        } else {
            0
        };
        let step = (base_ms + jitter).max(INTERVAL_FLOOR_MS);
        let at = prev + Duration::milliseconds(step);
        times.push(at);
        prev = at;
    }

    for i in 1..times.len() {
        let min_at = times[i - 1] + Duration::milliseconds(MIN_BEAT_SPACING_MS);
        if times[i] < min_at {
            times[i] = min_at;
        }
    }
    times
}
