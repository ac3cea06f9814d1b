use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fq_core::{Hero, HeroId, LedgerSnapshot, PlannedEvent, Quest, QuestEvent, QuestId};

use crate::ports::{HeroStore, PortError, PortResult, QuestStore};

#[derive(Debug, Default)]
struct Tables {
    quests: Vec<Quest>,
    plans: HashMap<QuestId, Vec<PlannedEvent>>,
    events: HashMap<QuestId, Vec<QuestEvent>>,
    snapshots: HashMap<QuestId, LedgerSnapshot>,
    hero: Option<Hero>,
    inventory: HashMap<HeroId, BTreeSet<String>>,
}

/// Quest and hero storage held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> PortResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| PortError::Storage("memory store lock poisoned".into()))
    }

    fn update_quest(&self, id: QuestId, apply: impl FnOnce(&mut Quest)) -> PortResult<()> {
        let mut tables = self.tables()?;
        let quest = tables
            .quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(PortError::NotFound)?;
        apply(quest);
        Ok(())
    }
}

#[async_trait]
impl QuestStore for MemoryStore {
    async fn insert_quest(&self, quest: &Quest) -> PortResult<()> {
        self.tables()?.quests.push(quest.clone());
        Ok(())
    }

    async fn latest_quest(&self) -> PortResult<Option<Quest>> {
        Ok(self.tables()?.quests.last().cloned())
    }

    async fn mark_quest_completed(&self, id: QuestId, end_time: DateTime<Utc>) -> PortResult<()> {
        self.update_quest(id, |quest| {
            quest.completed = true;
            quest.end_time = Some(end_time);
        })
    }

    async fn mark_quest_gave_up(&self, id: QuestId, end_time: DateTime<Utc>) -> PortResult<()> {
        self.update_quest(id, |quest| {
            quest.gave_up = true;
            quest.end_time = Some(end_time);
        })
    }

    async fn save_quest_plan(&self, id: QuestId, plan: &[PlannedEvent]) -> PortResult<()> {
        self.tables()?.plans.insert(id, plan.to_vec());
        Ok(())
    }

    async fn get_quest_plan(&self, id: QuestId) -> PortResult<Option<Vec<PlannedEvent>>> {
        Ok(self.tables()?.plans.get(&id).cloned())
    }

    async fn append_quest_event(&self, event: &QuestEvent) -> PortResult<()> {
        self.tables()?
            .events
            .entry(event.quest_id)
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn get_quest_events(&self, id: QuestId) -> PortResult<Vec<QuestEvent>> {
        Ok(self.tables()?.events.get(&id).cloned().unwrap_or_default())
    }

    async fn get_quest_events_preview(&self, id: QuestId, n: usize) -> PortResult<Vec<QuestEvent>> {
        let tables = self.tables()?;
        let events = tables.events.get(&id).map(Vec::as_slice).unwrap_or_default();
        let skip = events.len().saturating_sub(n);
        Ok(events[skip..].to_vec())
    }

    async fn get_last_resolved_event_idx(&self, id: QuestId) -> PortResult<Option<u32>> {
        let tables = self.tables()?;
        let last = tables
            .events
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|e| u32::try_from(e.idx).ok())
            .max();
        Ok(last)
    }

    async fn count_narration_events(&self, id: QuestId) -> PortResult<usize> {
        let tables = self.tables()?;
        let count = tables
            .events
            .get(&id)
            .into_iter()
            .flatten()
            .filter(|e| e.is_narration_line())
            .count();
        Ok(count)
    }

    async fn save_ledger_snapshot(&self, id: QuestId, snapshot: &LedgerSnapshot) -> PortResult<()> {
        self.tables()?.snapshots.insert(id, snapshot.clone());
        Ok(())
    }

    async fn get_ledger_snapshot(&self, id: QuestId) -> PortResult<Option<LedgerSnapshot>> {
        Ok(self.tables()?.snapshots.get(&id).cloned())
    }
}

#[async_trait]
impl HeroStore for MemoryStore {
    async fn current_hero(&self) -> PortResult<Option<Hero>> {
        Ok(self.tables()?.hero.clone())
    }

    async fn insert_hero(&self, hero: &Hero) -> PortResult<()> {
        self.tables()?.hero = Some(hero.clone());
        Ok(())
    }

    async fn update_hero(&self, hero: &Hero) -> PortResult<()> {
        let mut tables = self.tables()?;
        match tables.hero.as_mut() {
            Some(current) if current.id == hero.id => {
                *current = hero.clone();
                Ok(())
            }
            _ => Err(PortError::NotFound),
        }
    }

    async fn owned_item_ids(&self, hero_id: HeroId) -> PortResult<Vec<String>> {
        let tables = self.tables()?;
        Ok(tables
            .inventory
            .get(&hero_id)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_item_once(&self, hero_id: HeroId, item_id: &str) -> PortResult<bool> {
        let mut tables = self.tables()?;
        Ok(tables
            .inventory
            .entry(hero_id)
            .or_default()
            .insert(item_id.to_string()))
    }
}
