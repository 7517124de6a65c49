use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::{TransitionKind, DEFAULT_ANIMATION_DURATION_MS};

/// How a back/forward notification is turned into the page it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Run the regular fetch-and-swap path without pushing history.
    #[default]
    Replay,
    /// Ask the surface to reload the entry's URL.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub transition_kind: TransitionKind,
    pub animation_duration_ms: u64,
    pub fetch_timeout_ms: u64,
    pub restore_mode: RestoreMode,
    pub min_swipe_distance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transition_kind: TransitionKind::Slide,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            fetch_timeout_ms: 10_000,
            restore_mode: RestoreMode::Replay,
            min_swipe_distance: 50.0,
        }
    }
}

impl EngineConfig {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("malformed engine config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config '{}'", path.display()))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_published_animation_duration() {
        let config = EngineConfig::default();
        assert_eq!(config.animation_duration(), Duration::from_millis(600));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.restore_mode, RestoreMode::Replay);
        assert_eq!(config.min_swipe_distance, 50.0);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
                transition_kind = "cube"
                restore_mode = "reload"
            "#,
        )
        .expect("config");
        assert_eq!(config.transition_kind, TransitionKind::Cube);
        assert_eq!(config.restore_mode, RestoreMode::Reload);
        assert_eq!(config.animation_duration_ms, 600);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EngineConfig::from_toml_str("speed = 3").expect_err("unknown key");
        assert!(err.to_string().contains("malformed engine config"));
    }
}
