//! Turning due beats into persisted events.
//!
//! Both the orchestrator (at completion) and the live feed (after commit)
//! walk the plan forward from the last resolved index, so a beat is resolved
//! and appended at most once no matter who gets there first.

use chrono::{DateTime, Utc};

use fq_core::{PlannedEvent, Quest, QuestEvent, RewardLedger};

use crate::context::QuestContext;
use crate::planner::{PlanSpec, plan};
use crate::ports::{PortResult, QuestStore};
use crate::resolver::resolve_from_ledger;

/// Which beats count as due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    /// Beats whose `due_at` is at or before the instant.
    Until(DateTime<Utc>),
    /// Every planned beat.
    All,
}

impl Due {
    pub fn includes(&self, beat: &PlannedEvent) -> bool {
        match self {
            Self::Until(now) => beat.due_at <= *now,
            Self::All => true,
        }
    }
}

/// The planner input for a quest under a context.
pub fn plan_spec(quest: &Quest, ctx: &QuestContext) -> PlanSpec {
    PlanSpec {
        quest_id: quest.id,
        duration_minutes: quest.duration_minutes,
        seed: ctx.base_seed,
        start_at: quest.start_time,
        hero_level: ctx.hero_level,
        class_type: ctx.class_type,
    }
}

/// Load the stored plan, or plan the quest and store it.
pub async fn ensure_plan(
    store: &dyn QuestStore,
    quest: &Quest,
    ctx: &QuestContext,
) -> PortResult<Vec<PlannedEvent>> {
    if let Some(existing) = store.get_quest_plan(quest.id).await? {
        return Ok(existing);
    }
    let beats = plan(&plan_spec(quest, ctx));
    store.save_quest_plan(quest.id, &beats).await?;
    log::debug!("saved plan of {} beats for quest {}", beats.len(), quest.id);
    Ok(beats)
}

/// Resolve and append every due beat past the last resolved index.
///
/// Returns the events appended by this call, in index order.
pub async fn replay_due_beats(
    store: &dyn QuestStore,
    ctx: &QuestContext,
    beats: &[PlannedEvent],
    ledger: &RewardLedger,
    due: Due,
) -> PortResult<Vec<QuestEvent>> {
    let last = store.get_last_resolved_event_idx(ctx.quest_id).await?;
    let mut pending: Vec<&PlannedEvent> = beats
        .iter()
        .filter(|beat| last.is_none_or(|l| beat.idx > l))
        .filter(|beat| due.includes(beat))
        .collect();
    pending.sort_by_key(|beat| beat.idx);

    let mut appended = Vec::with_capacity(pending.len());
    for beat in pending {
        let (xp, gold) = ledger.deltas_for(beat.idx);
        let event = resolve_from_ledger(ctx, beat, xp, gold);
        store.append_quest_event(&event).await?;
        appended.push(event);
    }
    if !appended.is_empty() {
        log::debug!("replayed {} beats for quest {}", appended.len(), ctx.quest_id);
    }
    Ok(appended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fq_core::{ClassType, Hero, QuestLoot, QuestType};

    use crate::adapter::MemoryStore;
    use crate::ledger::allocate;

    fn fixture() -> (Quest, QuestContext) {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let hero = Hero::new("Ada", ClassType::Warrior);
        let quest = Quest::new(hero.id, QuestType::Focus, 30, start);
        let ctx = QuestContext::new(&quest, &hero);
        (quest, ctx)
    }

    #[tokio::test]
    async fn plan_is_created_once() {
        let store = MemoryStore::new();
        let (quest, ctx) = fixture();
        let first = ensure_plan(&store, &quest, &ctx).await.unwrap();
        let second = ensure_plan(&store, &quest, &ctx).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, plan(&plan_spec(&quest, &ctx)));
    }

    #[tokio::test]
    async fn replays_only_due_and_unresolved_beats() {
        let store = MemoryStore::new();
        let (quest, ctx) = fixture();
        let beats = ensure_plan(&store, &quest, &ctx).await.unwrap();
        let ledger = allocate(&ctx, &beats, &QuestLoot::new(240, 12));

        let cutoff = beats[2].due_at;
        let early = replay_due_beats(&store, &ctx, &beats, &ledger, Due::Until(cutoff))
            .await
            .unwrap();
        assert_eq!(early.iter().map(|e| e.idx).collect::<Vec<_>>(), vec![0, 1, 2]);

        let again = replay_due_beats(&store, &ctx, &beats, &ledger, Due::Until(cutoff))
            .await
            .unwrap();
        assert!(again.is_empty());

        let rest = replay_due_beats(&store, &ctx, &beats, &ledger, Due::All)
            .await
            .unwrap();
        assert_eq!(rest.len(), beats.len() - 3);
        assert_eq!(store.get_quest_events(quest.id).await.unwrap().len(), beats.len());
    }

    #[tokio::test]
    async fn replay_matches_direct_resolution() {
        let store = MemoryStore::new();
        let (quest, ctx) = fixture();
        let beats = ensure_plan(&store, &quest, &ctx).await.unwrap();
        let ledger = allocate(&ctx, &beats, &QuestLoot::new(240, 12));
        let events = replay_due_beats(&store, &ctx, &beats, &ledger, Due::All)
            .await
            .unwrap();
        for (beat, event) in beats.iter().zip(&events) {
            let (xp, gold) = ledger.deltas_for(beat.idx);
            assert_eq!(event, &resolve_from_ledger(&ctx, beat, xp, gold));
        }
    }
}
