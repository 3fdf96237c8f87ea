//! Command execution helpers
//!
//! Every command body runs through [`execute_command`] so that timing and
//! outcome logging look the same across modules.

use std::time::Instant;

use lapse_domain::Result as DomainResult;

use crate::utils::logging::log_command_execution;

/// Execute a command body, timing it and logging the outcome
///
/// # Example
///
/// ```rust,ignore
/// pub fn stop_timer(ctx: &mut AppContext) -> Result<Session> {
///     execute_command("timer::stop", || ctx.sessions.stop_timer())
/// }
/// ```
pub fn execute_command<F, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T>,
{
    let start = Instant::now();
    let result = command_fn();
    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}
