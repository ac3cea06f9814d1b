use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fq_core::{Quest, QuestLoot};

use crate::ports::{PortError, PortResult, RewardValidator, StatusEffects};

/// Grace window plus a time-bounded reward penalty.
///
/// A retreat after `grace_secs` curses the hero for as long as the quest had
/// left to run. While cursed, rewards are scaled by `penalty_factor`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurseConfig {
    pub grace_secs: i64,
    pub penalty_factor: f64,
}

impl Default for CurseConfig {
    fn default() -> Self {
        Self {
            grace_secs: 60,
            penalty_factor: 0.5,
        }
    }
}

impl CurseConfig {
    pub fn with_grace_secs(mut self, secs: i64) -> Self {
        self.grace_secs = secs.max(0);
        self
    }

    pub fn with_penalty_factor(mut self, factor: f64) -> Self {
        self.penalty_factor = factor.clamp(0.0, 1.0);
        self
    }
}

/// In-memory [`StatusEffects`] driven by a [`CurseConfig`].
#[derive(Debug, Default)]
pub struct GraceCurse {
    config: CurseConfig,
    cursed_until_ms: Mutex<Option<i64>>,
}

impl GraceCurse {
    pub fn new(config: CurseConfig) -> Self {
        Self {
            config,
            cursed_until_ms: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CurseConfig {
        &self.config
    }

    /// End of the active curse, if one was applied.
    pub fn cursed_until_ms(&self) -> Option<i64> {
        *self.cursed_until_ms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> PortResult<MutexGuard<'_, Option<i64>>> {
        self.cursed_until_ms
            .lock()
            .map_err(|_| PortError::Storage("curse lock poisoned".into()))
    }

    fn is_cursed(&self, now_ms: i64) -> PortResult<bool> {
        Ok(self.state()?.is_some_and(|until| now_ms < until))
    }
}

#[async_trait]
impl StatusEffects for GraceCurse {
    async fn is_in_grace(&self, elapsed_secs: i64) -> PortResult<bool> {
        Ok(elapsed_secs < self.config.grace_secs)
    }

    async fn apply_retreat_curse(&self, now_ms: i64, remaining_ms: i64) -> PortResult<()> {
        let until = now_ms + remaining_ms.max(0);
        let mut current = self.state()?;
        // A longer curse already in force is kept.
        *current = Some(current.map_or(until, |c| c.max(until)));
        log::info!("retreat curse active until {until}");
        Ok(())
    }

    async fn clear_curse(&self, now_ms: i64) -> PortResult<bool> {
        let mut current = self.state()?;
        if !current.is_some_and(|until| now_ms < until) {
            return Ok(false);
        }
        *current = None;
        Ok(true)
    }

    async fn reward_multiplier(&self, now_ms: i64) -> PortResult<f64> {
        if self.is_cursed(now_ms)? {
            Ok(self.config.penalty_factor)
        } else {
            Ok(1.0)
        }
    }
}

/// Validator that never overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidator;

#[async_trait]
impl RewardValidator for NoValidator {
    async fn validate(&self, _quest: &Quest, _proposed: &QuestLoot) -> PortResult<Option<QuestLoot>> {
        Ok(None)
    }
}

/// Validator that answers every quest with the same loot.
#[derive(Debug, Clone, Default)]
pub struct FixedValidator {
    pub answer: Option<QuestLoot>,
}

impl FixedValidator {
    pub fn new(answer: Option<QuestLoot>) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl RewardValidator for FixedValidator {
    async fn validate(&self, _quest: &Quest, _proposed: &QuestLoot) -> PortResult<Option<QuestLoot>> {
        Ok(self.answer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grace_window_is_exclusive() {
        let curse = GraceCurse::new(CurseConfig::default());
        assert_eq!(curse.config().grace_secs, 60);
        assert!(curse.is_in_grace(10).await.unwrap());
        assert!(curse.is_in_grace(59).await.unwrap());
        assert!(!curse.is_in_grace(60).await.unwrap());
    }

    #[tokio::test]
    async fn curse_expires_after_remaining_time() {
        let curse = GraceCurse::new(CurseConfig::default());
        curse.apply_retreat_curse(1_000, 5_000).await.unwrap();
        assert_eq!(curse.reward_multiplier(2_000).await.unwrap(), 0.5);
        assert_eq!(curse.reward_multiplier(6_000).await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn clearing_reports_whether_anything_was_cleared() {
        let curse = GraceCurse::new(CurseConfig::default());
        assert!(!curse.clear_curse(0).await.unwrap());
        curse.apply_retreat_curse(0, 10_000).await.unwrap();
        assert!(curse.clear_curse(100).await.unwrap());
        assert_eq!(curse.reward_multiplier(200).await.unwrap(), 1.0);
        assert_eq!(curse.cursed_until_ms(), None);
    }

    #[tokio::test]
    async fn shorter_curse_does_not_shorten_active_one() {
        let curse = GraceCurse::new(CurseConfig::default());
        curse.apply_retreat_curse(0, 10_000).await.unwrap();
        curse.apply_retreat_curse(1_000, 1_000).await.unwrap();
        assert_eq!(curse.cursed_until_ms(), Some(10_000));
    }

    fn poison(curse: &GraceCurse) {
        std::thread::scope(|s| {
            let crashed = s
                .spawn(|| {
                    let _held = curse.cursed_until_ms.lock();
                    panic!("crash while holding the curse lock");
                })
                .join();
            assert!(crashed.is_err());
        });
    }

    #[tokio::test]
    async fn poisoned_lock_surfaces_as_storage_error() {
        let curse = GraceCurse::new(CurseConfig::default());
        curse.apply_retreat_curse(0, 10_000).await.unwrap();
        poison(&curse);

        let applied = curse.apply_retreat_curse(1_000, 60_000).await;
        assert!(matches!(applied, Err(PortError::Storage(_))));
        assert!(matches!(curse.clear_curse(1_000).await, Err(PortError::Storage(_))));
        assert!(matches!(curse.reward_multiplier(1_000).await, Err(PortError::Storage(_))));
        assert_eq!(curse.cursed_until_ms(), Some(10_000));
    }

    #[test]
    fn config_builders_clamp() {
        let config = CurseConfig::default()
            .with_grace_secs(-5)
            .with_penalty_factor(3.0);
        assert_eq!(config.grace_secs, 0);
        assert_eq!(config.penalty_factor, 1.0);
    }
}
