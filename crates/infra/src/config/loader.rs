//! Configuration loader
//!
//! ## Loading Strategy
//! 1. `LAPSE_CONFIG` names a file explicitly; otherwise probe standard paths
//! 2. No file found: start from [`Config::default`]
//! 3. Apply `LAPSE_*` environment overrides on top
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `LAPSE_CONFIG`: Explicit config file path
//! - `LAPSE_DATA_DIR`: Directory holding the state files
//! - `LAPSE_DEBOUNCE_MS`: Quiet period for debounced writes
//! - `LAPSE_IDLE_ENABLED`: Whether screen lock detection runs (true/false)
//! - `LAPSE_IDLE_THRESHOLD_MS`: Platform idle threshold
//! - `LAPSE_AWAY_THRESHOLD_MS`: Minimum away duration that needs a decision
//! - `LAPSE_TICK_INTERVAL_MS`: Live timer refresh interval
//! - `LAPSE_LOG_LEVEL`: Default `EnvFilter` directive
//! - `LAPSE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes `lapse.toml`, `lapse.json`, `config.toml` and
//! `config.json` in the current directory, its parent, its grandparent and
//! next to the executable, in that order.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use lapse_domain::{Config, LapseError, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["lapse.toml", "lapse.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `LapseError::Config` if:
/// - `LAPSE_CONFIG` names a missing file
/// - A config file exists but cannot be parsed
/// - An environment override has an invalid value
/// - The final configuration fails validation
pub fn load() -> Result<Config> {
    let explicit = std::env::var("LAPSE_CONFIG").ok().map(PathBuf::from);
    let mut config = match explicit.or_else(probe_config_paths) {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by extension. The result is not validated; [`load`] does that after
/// environment overrides.
///
/// # Errors
/// Returns `LapseError::Config` if the file is missing, unreadable or
/// malformed, or if no file is found when probing.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LapseError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LapseError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LapseError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Overlay `LAPSE_*` environment variables onto `config`
///
/// Unset variables leave the field untouched.
///
/// # Errors
/// Returns `LapseError::Config` naming the variable whose value does not
/// parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(dir) = env_opt("LAPSE_DATA_DIR") {
        config.storage.data_dir = dir;
    }
    if let Some(ms) = env_parse("LAPSE_DEBOUNCE_MS")? {
        config.storage.debounce_ms = ms;
    }
    config.idle.enabled = env_bool("LAPSE_IDLE_ENABLED", config.idle.enabled);
    if let Some(ms) = env_parse("LAPSE_IDLE_THRESHOLD_MS")? {
        config.idle.threshold_ms = ms;
    }
    if let Some(ms) = env_parse("LAPSE_AWAY_THRESHOLD_MS")? {
        config.idle.away_threshold_ms = ms;
    }
    if let Some(ms) = env_parse("LAPSE_TICK_INTERVAL_MS")? {
        config.timer.tick_interval_ms = ms;
    }
    if let Some(level) = env_opt("LAPSE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("LAPSE_LOG_JSON", config.logging.json);
    Ok(())
}

/// Parse configuration from string content
///
/// # Errors
/// Returns `LapseError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LapseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LapseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(LapseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| LapseError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
