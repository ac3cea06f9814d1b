//! Configuration for a quest engine.

use serde::{Deserialize, Serialize};

/// Runtime knobs for the engine and the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the live feed clock, in milliseconds.
    pub tick_interval_ms: u64,
    /// How many recent narration picks to avoid repeating, per category.
    pub narration_memory: usize,
    /// How many recent events `QuestEngine::recent_events` returns.
    pub preview_limit: usize,
    /// Title used for ongoing and completion notifications.
    pub notification_title: String,
    /// Name given to a hero created on first start.
    pub hero_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            narration_memory: 4,
            preview_limit: 1,
            notification_title: "Quest in progress".to_string(),
            hero_name: "Wanderer".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the feed tick interval (at least 1 ms).
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms.max(1);
        self
    }

    /// Set the narration memory depth.
    pub fn with_narration_memory(mut self, depth: usize) -> Self {
        self.narration_memory = depth;
        self
    }

    /// Set how many events `QuestEngine::recent_events` returns (at least 1).
    pub fn with_preview_limit(mut self, n: usize) -> Self {
        self.preview_limit = n.max(1);
        self
    }

    /// Set the notification title.
    pub fn with_notification_title(mut self, title: impl Into<String>) -> Self {
        self.notification_title = title.into();
        self
    }

    /// Set the name for newly created heroes.
    pub fn with_hero_name(mut self, name: impl Into<String>) -> Self {
        self.hero_name = name.into();
        self
    }

    /// The tick interval as a [`std::time::Duration`].
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert_eq!(cfg.narration_memory, 4);
        assert_eq!(cfg.preview_limit, 1);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_tick_interval_ms(250)
            .with_narration_memory(2)
            .with_hero_name("Kestrel");
        assert_eq!(cfg.tick_interval(), std::time::Duration::from_millis(250));
        assert_eq!(cfg.narration_memory, 2);
        assert_eq!(cfg.hero_name, "Kestrel");
    }

    #[test]
    fn tick_interval_clamped() {
        let cfg = EngineConfig::default().with_tick_interval_ms(0);
        assert_eq!(cfg.tick_interval_ms, 1);
        let cfg = EngineConfig::default().with_preview_limit(0);
        assert_eq!(cfg.preview_limit, 1);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = EngineConfig::from_json(r#"{"hero_name": "Moss"}"#).unwrap();
        assert_eq!(cfg.hero_name, "Moss");
        assert_eq!(cfg.tick_interval_ms, 1000);
    }
}
