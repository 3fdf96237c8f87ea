//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level is used as the
//! `EnvFilter` directive. Output goes to stderr so that command output on
//! stdout stays machine-readable.

use lapse_domain::{LapseError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to `config.level`
///
/// # Errors
/// Returns `LapseError::Config` if `config.level` is not a valid directive.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LapseError::Config(format!("Invalid log level {:?}: {e}", config.level))),
    }
}

/// Install the global subscriber
///
/// # Errors
/// Returns `LapseError::Config` for an invalid level and
/// `LapseError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };
    installed.map_err(|e| LapseError::Internal(format!("tracing already initialised: {e}")))?;

    tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    Ok(())
}
