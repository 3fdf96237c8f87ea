use std::time::Duration;

use lapse_domain::LapseError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"timer::start"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - The failure, if the command did not succeed.
///
/// User-facing failures (validation, timer state) are logged at `info`;
/// they are expected outcomes, not faults.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&LapseError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) if err.is_user_facing() => info!(
            command,
            duration_ms,
            error_type = err.label(),
            error = %err,
            "command_execution_failure"
        ),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = err.label(),
            error = %err,
            "command_execution_failure"
        ),
    }
}
