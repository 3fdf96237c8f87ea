//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AWAY_THRESHOLD_MS, DEFAULT_DEBOUNCE_MS, DEFAULT_IDLE_THRESHOLD_MS,
    DEFAULT_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS,
};
use crate::errors::{LapseError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub idle: IdleConfig,
    pub timer: TimerConfig,
    pub logging: LoggingConfig,
}

/// Where and how state is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub debounce_ms: u64,
}

/// Screen-lock detection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub enabled: bool,
    /// Passed to the platform detector
    pub threshold_ms: u64,
    /// Minimum away duration that asks for a decision
    pub away_threshold_ms: u64,
}

/// Live timer display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub tick_interval_ms: u64,
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: ".lapse".to_string(), debounce_ms: DEFAULT_DEBOUNCE_MS }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_ms: DEFAULT_IDLE_THRESHOLD_MS,
            away_threshold_ms: DEFAULT_AWAY_THRESHOLD_MS,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { tick_interval_ms: DEFAULT_TICK_INTERVAL_MS }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Config {
    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    /// Returns `LapseError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(LapseError::Config("storage.data_dir must not be empty".into()));
        }
        if !(1..=MAX_TICK_INTERVAL_MS).contains(&self.timer.tick_interval_ms) {
            return Err(LapseError::Config(format!(
                "timer.tick_interval_ms must be between 1 and {MAX_TICK_INTERVAL_MS}, got {}",
                self.timer.tick_interval_ms
            )));
        }
        if self.idle.threshold_ms == 0 {
            return Err(LapseError::Config("idle.threshold_ms must be positive".into()));
        }
        if self.idle.away_threshold_ms == 0 {
            return Err(LapseError::Config("idle.away_threshold_ms must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.debounce_ms, 200);
        assert_eq!(config.idle.away_threshold_ms, 60_000);
        assert_eq!(config.timer.tick_interval_ms, 200);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "idle": { "away_threshold_ms": 120000 } }"#).expect("parse");
        assert_eq!(config.idle.away_threshold_ms, 120_000);
        assert_eq!(config.idle.threshold_ms, 60_000);
        assert!(config.idle.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_slow_ticks_and_zero_thresholds() {
        let mut config = Config::default();
        config.timer.tick_interval_ms = 1_000;
        assert!(matches!(config.validate(), Err(LapseError::Config(_))));

        let mut config = Config::default();
        config.idle.away_threshold_ms = 0;
        assert!(matches!(config.validate(), Err(LapseError::Config(_))));
    }
}
