//! Live preview of a running quest.
//!
//! [`FeedReplayer::recompute`] answers "which beats are visible right now".
//! Before completion the answer comes from a provisional ledger built from
//! the base roll; after completion it comes from the committed snapshot.
//! Because both go through the same allocator and resolver, a beat shown
//! early reads the same once committed, as long as the final total matched
//! the estimate.
//!
//! [`spawn_feed`] drives a replayer from a ticking interval and the latest
//! hero and quest values, pushing snapshots to a single consumer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use fq_core::{Hero, PlannedEvent, Quest, QuestEvent, QuestId, RewardLedger};

use crate::config::EngineConfig;
use crate::context::QuestContext;
use crate::economy::roll_loot;
use crate::error::EngineResult;
use crate::ledger::{allocate, reconstruct};
use crate::ports::{Clock, Notifier, QuestStore};
use crate::replay::{Due, ensure_plan, replay_due_beats};
use crate::resolver::resolve_from_ledger;

/// Snapshots buffered between the feed task and its consumer.
const FEED_BUFFER: usize = 16;

/// What the feed shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// `None` when no quest is running.
    pub quest_id: Option<QuestId>,
    /// Narration lines and visible beats, oldest first.
    pub events: Vec<QuestEvent>,
    /// Whether the beats come from a provisional ledger.
    pub provisional: bool,
}

impl FeedSnapshot {
    fn empty() -> Self {
        Self {
            quest_id: None,
            events: Vec::new(),
            provisional: false,
        }
    }

    /// Number of beat events, narration excluded.
    pub fn beat_count(&self) -> usize {
        self.events.iter().filter(|e| !e.is_narration_line()).count()
    }

    /// The most recent beat event.
    pub fn latest_beat(&self) -> Option<&QuestEvent> {
        self.events.iter().rev().find(|e| !e.is_narration_line())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmitKey {
    quest_id: Option<QuestId>,
    beats: usize,
    provisional: bool,
}

#[derive(Debug)]
struct Provisional {
    quest_id: QuestId,
    hero_level: u32,
    ledger: RewardLedger,
    resolved: Vec<QuestEvent>,
}

/// Recomputes the visible beats of the current quest.
///
/// Holds per-quest caches, so one replayer serves one feed.
pub struct FeedReplayer {
    quests: Arc<dyn QuestStore>,
    notifier: Arc<dyn Notifier>,
    title: String,
    tick: std::time::Duration,
    last_planned: Option<QuestId>,
    plan: Vec<PlannedEvent>,
    provisional: Option<Provisional>,
    committed: Option<(QuestId, RewardLedger)>,
    emitted: Option<EmitKey>,
}

impl FeedReplayer {
    /// A replayer ticking at the default interval.
    pub fn new(quests: Arc<dyn QuestStore>, notifier: Arc<dyn Notifier>, title: impl Into<String>) -> Self {
        Self {
            quests,
            notifier,
            title: title.into(),
            tick: EngineConfig::default().tick_interval(),
            last_planned: None,
            plan: Vec::new(),
            provisional: None,
            committed: None,
            emitted: None,
        }
    }

    /// A replayer using the configured notification title and tick interval.
    pub fn from_config(quests: Arc<dyn QuestStore>, notifier: Arc<dyn Notifier>, config: &EngineConfig) -> Self {
        Self {
            tick: config.tick_interval(),
            ..Self::new(quests, notifier, config.notification_title.clone())
        }
    }

    /// How often [`spawn_feed`] recomputes this replayer.
    pub fn tick_interval(&self) -> std::time::Duration {
        self.tick
    }

    /// Recompute the feed at `now`.
    ///
    /// Returns `None` when nothing changed since the last emitted snapshot.
    pub async fn recompute(
        &mut self,
        hero: Option<&Hero>,
        quest: Option<&Quest>,
        now: DateTime<Utc>,
    ) -> EngineResult<Option<FeedSnapshot>> {
        let (hero, quest) = match (hero, quest) {
            (Some(hero), Some(quest)) if !quest.gave_up => (hero, quest),
            _ => {
                self.clear();
                return Ok(self.emit(FeedSnapshot::empty()));
            }
        };

        let ctx = QuestContext::new(quest, hero);
        if self.last_planned != Some(quest.id) {
            self.clear();
            self.plan = ensure_plan(self.quests.as_ref(), quest, &ctx).await?;
            self.last_planned = Some(quest.id);
        }

        let snapshot = match self.quests.get_ledger_snapshot(quest.id).await? {
            Some(snapshot) => {
                let ctx = ctx.with_snapshot(&snapshot);
                let ledger = match self.committed.take() {
                    Some((id, ledger)) if id == quest.id && ledger.hash == snapshot.hash => ledger,
                    _ => reconstruct(&ctx, &self.plan, &snapshot)?,
                };
                replay_due_beats(self.quests.as_ref(), &ctx, &self.plan, &ledger, Due::Until(now)).await?;
                self.committed = Some((quest.id, ledger));
                self.provisional = None;
                FeedSnapshot {
                    quest_id: Some(quest.id),
                    events: self.quests.get_quest_events(quest.id).await?,
                    provisional: false,
                }
            }
            None => {
                let beats = self.provisional_beats(quest, &ctx, now);
                let mut events: Vec<QuestEvent> = self
                    .quests
                    .get_quest_events(quest.id)
                    .await?
                    .into_iter()
                    .filter(QuestEvent::is_narration_line)
                    .collect();
                events.extend(beats);
                events.sort_by_key(|e| e.at);
                FeedSnapshot {
                    quest_id: Some(quest.id),
                    events,
                    provisional: true,
                }
            }
        };

        let grew = self.emitted.is_some_and(|key| {
            key.quest_id == snapshot.quest_id && snapshot.beat_count() > key.beats
        });
        let emitted = self.emit(snapshot);
        if grew
            && !quest.completed
            && let Some(beat) = emitted.as_ref().and_then(FeedSnapshot::latest_beat)
        {
            let refreshed = self
                .notifier
                .show_ongoing(quest.id, &self.title, &beat.message, quest.planned_end())
                .await;
            if let Err(e) = refreshed {
                log::warn!("ongoing notification not refreshed: {e}");
            }
        }
        Ok(emitted)
    }

    /// Resolve provisional beats due by `now`, reusing earlier resolutions.
    fn provisional_beats(&mut self, quest: &Quest, ctx: &QuestContext, now: DateTime<Utc>) -> Vec<QuestEvent> {
        let stale = self
            .provisional
            .as_ref()
            .is_none_or(|p| p.quest_id != quest.id || p.hero_level != ctx.hero_level);
        if stale {
            let estimate = roll_loot(quest.duration_minutes, ctx.hero_level, ctx.class_type, ctx.base_seed);
            self.provisional = Some(Provisional {
                quest_id: quest.id,
                hero_level: ctx.hero_level,
                ledger: allocate(ctx, &self.plan, &estimate),
                resolved: Vec::new(),
            });
        }
        let Some(cache) = self.provisional.as_mut() else {
            return Vec::new();
        };

        let due: Vec<&PlannedEvent> = self.plan.iter().filter(|b| b.due_at <= now).collect();
        if due.len() < cache.resolved.len() {
            cache.resolved.truncate(due.len());
        }
        for beat in &due[cache.resolved.len()..] {
            let (xp, gold) = cache.ledger.deltas_for(beat.idx);
            cache.resolved.push(resolve_from_ledger(ctx, beat, xp, gold));
        }
        cache.resolved.clone()
    }

    fn emit(&mut self, snapshot: FeedSnapshot) -> Option<FeedSnapshot> {
        let key = EmitKey {
            quest_id: snapshot.quest_id,
            beats: snapshot.beat_count(),
            provisional: snapshot.provisional,
        };
        if self.emitted == Some(key) {
            return None;
        }
        self.emitted = Some(key);
        Some(snapshot)
    }

    fn clear(&mut self) {
        self.last_planned = None;
        self.plan.clear();
        self.provisional = None;
        self.committed = None;
    }
}

/// Consumer side of a running feed.
pub struct FeedHandle {
    snapshots: mpsc::Receiver<FeedSnapshot>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Wait for the next snapshot. `None` once the feed has stopped.
    pub async fn next(&mut self) -> Option<FeedSnapshot> {
        self.snapshots.recv().await
    }

    /// Stop the feed task.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `replayer` on every tick of its interval against the latest hero
/// and quest.
///
/// Snapshots arrive in tick order. A failed recompute is logged and the
/// feed carries on with the next tick.
pub fn spawn_feed(
    mut replayer: FeedReplayer,
    hero_rx: watch::Receiver<Option<Hero>>,
    quest_rx: watch::Receiver<Option<Quest>>,
    clock: Arc<dyn Clock>,
) -> FeedHandle {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);
    let tick = replayer.tick_interval();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let hero = hero_rx.borrow().clone();
            let quest = quest_rx.borrow().clone();
            match replayer.recompute(hero.as_ref(), quest.as_ref(), clock.now()).await {
                Ok(Some(snapshot)) => {
                    if tx.send(snapshot).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("feed recompute failed: {e}"),
            }
        }
        log::debug!("feed stopped");
    });
    FeedHandle { snapshots: rx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::{Duration, TimeZone};
    use fq_core::{ClassType, QuestType};

    use crate::adapter::{CurseConfig, GraceCurse, LogNotifier, ManualClock, MemoryStore, NoValidator};
    use crate::config::EngineConfig;
    use crate::lifecycle::{Collaborators, QuestEngine};
    use crate::ports::HeroStore;

    struct Rig {
        engine: QuestEngine,
        store: Arc<MemoryStore>,
        notifier: Arc<LogNotifier>,
        clock: Arc<ManualClock>,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn rig() -> Rig {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(LogNotifier::new());
        let clock = Arc::new(ManualClock::new(t0()));
        let ports = Collaborators {
            quests: store.clone(),
            heroes: store.clone(),
            notifier: notifier.clone(),
            status: Arc::new(GraceCurse::new(CurseConfig::default())),
            validator: Arc::new(NoValidator),
            clock: clock.clone(),
        };
        Rig {
            engine: QuestEngine::new(ports, EngineConfig::default()),
            store,
            notifier,
            clock,
        }
    }

    fn replayer(rig: &Rig) -> FeedReplayer {
        FeedReplayer::new(rig.store.clone(), rig.notifier.clone(), "Quest in progress")
    }

    async fn current(rig: &Rig) -> (Hero, Quest) {
        let hero = rig.store.current_hero().await.unwrap().unwrap();
        let quest = rig.store.latest_quest().await.unwrap().unwrap();
        (hero, quest)
    }

    async fn plan_of(rig: &Rig, quest: &Quest) -> Vec<PlannedEvent> {
        rig.store.get_quest_plan(quest.id).await.unwrap().unwrap()
    }

    fn beat_messages(snapshot: &FeedSnapshot) -> HashMap<i32, String> {
        snapshot
            .events
            .iter()
            .filter(|e| !e.is_narration_line())
            .map(|e| (e.idx, e.message.clone()))
            .collect()
    }

    #[tokio::test]
    async fn idle_feed_emits_empty_once() {
        let rig = rig();
        let mut feed = replayer(&rig);
        let first = feed.recompute(None, None, t0()).await.unwrap();
        assert_eq!(first, Some(FeedSnapshot::empty()));
        assert_eq!(feed.recompute(None, None, t0()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn provisional_beats_appear_as_they_fall_due() {
        let rig = rig();
        rig.engine.start(25, ClassType::Warrior, QuestType::Focus).await.unwrap();
        let (hero, quest) = current(&rig).await;
        let plan = plan_of(&rig, &quest).await;
        let mut feed = replayer(&rig);

        let opening = feed.recompute(Some(&hero), Some(&quest), t0()).await.unwrap().unwrap();
        assert!(opening.provisional);
        assert_eq!(opening.beat_count(), 0);
        assert_eq!(opening.events.len(), 1);

        let later = plan[1].due_at;
        let snapshot = feed.recompute(Some(&hero), Some(&quest), later).await.unwrap().unwrap();
        assert_eq!(snapshot.beat_count(), 2);
        assert!(snapshot.events[0].is_narration_line());
        assert_eq!(feed.recompute(Some(&hero), Some(&quest), later).await.unwrap(), None);

        // Nothing was persisted on the provisional path.
        let stored = rig.store.get_quest_events(quest.id).await.unwrap();
        assert!(stored.iter().all(QuestEvent::is_narration_line));
    }

    #[tokio::test]
    async fn new_beats_refresh_the_ongoing_notification() {
        let rig = rig();
        rig.engine.start(25, ClassType::Warrior, QuestType::Focus).await.unwrap();
        let (hero, quest) = current(&rig).await;
        let plan = plan_of(&rig, &quest).await;
        let mut feed = replayer(&rig);

        feed.recompute(Some(&hero), Some(&quest), t0()).await.unwrap();
        let snapshot = feed
            .recompute(Some(&hero), Some(&quest), plan[0].due_at)
            .await
            .unwrap()
            .unwrap();
        let latest = snapshot.latest_beat().unwrap();
        assert_eq!(rig.notifier.last_ongoing_text(), Some(latest.message.clone()));
    }

    #[tokio::test]
    async fn preview_converges_on_committed_ledger() {
        let rig = rig();
        rig.engine.start(25, ClassType::Mage, QuestType::Study).await.unwrap();
        let (hero, quest) = current(&rig).await;
        let plan = plan_of(&rig, &quest).await;
        let mut feed = replayer(&rig);

        let cutoff = plan[3].due_at;
        let preview = feed
            .recompute(Some(&hero), Some(&quest), cutoff)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(preview.beat_count(), 4);

        rig.clock.set(cutoff);
        rig.engine.complete().await.unwrap();
        let (hero, quest) = current(&rig).await;
        let committed = feed
            .recompute(Some(&hero), Some(&quest), cutoff)
            .await
            .unwrap()
            .unwrap();
        assert!(!committed.provisional);
        assert_eq!(committed.beat_count(), plan.len());

        let final_messages = beat_messages(&committed);
        for (idx, message) in beat_messages(&preview) {
            assert_eq!(final_messages.get(&idx), Some(&message), "beat {idx}");
        }
    }

    #[tokio::test]
    async fn abandoned_quest_clears_the_feed() {
        let rig = rig();
        rig.engine.start(25, ClassType::Warrior, QuestType::Focus).await.unwrap();
        let (hero, quest) = current(&rig).await;
        let mut feed = replayer(&rig);
        feed.recompute(Some(&hero), Some(&quest), t0()).await.unwrap();

        rig.engine.retreat().await.unwrap();
        let (hero, quest) = current(&rig).await;
        let cleared = feed.recompute(Some(&hero), Some(&quest), t0()).await.unwrap();
        assert_eq!(cleared, Some(FeedSnapshot::empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn pipeline_emits_in_tick_order() {
        let rig = rig();
        rig.engine.start(15, ClassType::Rogue, QuestType::Chore).await.unwrap();
        let (hero, quest) = current(&rig).await;
        let plan = plan_of(&rig, &quest).await;

        let config = EngineConfig::default().with_tick_interval_ms(5_000);
        let feed = FeedReplayer::from_config(rig.store.clone(), rig.notifier.clone(), &config);
        assert_eq!(feed.tick_interval(), std::time::Duration::from_secs(5));

        let (_hero_tx, hero_rx) = watch::channel(Some(hero));
        let (quest_tx, quest_rx) = watch::channel(Some(quest.clone()));
        let began = tokio::time::Instant::now();
        let mut handle = spawn_feed(feed, hero_rx, quest_rx, rig.clock.clone());

        let first = handle.next().await.unwrap();
        assert_eq!(first.quest_id, Some(quest.id));
        assert_eq!(first.beat_count(), 0);

        rig.clock.set(plan[0].due_at + Duration::seconds(1));
        let second = handle.next().await.unwrap();
        assert_eq!(second.beat_count(), 1);
        assert!(began.elapsed() >= std::time::Duration::from_secs(5));

        quest_tx.send(None).unwrap();
        let third = handle.next().await.unwrap();
        assert_eq!(third, FeedSnapshot::empty());
        handle.stop();
    }
}
