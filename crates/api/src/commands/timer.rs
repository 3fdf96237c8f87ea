//! Timer commands

use lapse_core::TimerStatus;
use lapse_domain::{ActiveTimer, Result, Session};

use super::projects::resolve_project_id;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Start timing a project given by id or name
pub fn start_timer(ctx: &mut AppContext, project: &str) -> Result<ActiveTimer> {
    execute_command("timer::start", || {
        let project_id = resolve_project_id(&ctx.sessions, project)?;
        ctx.sessions.start_timer(&project_id)
    })
}

/// Stop the timer and answer the note prompt in one go
///
/// A blank or missing `note` cancels the prompt and leaves the session's
/// note empty.
pub fn stop_timer(ctx: &mut AppContext, note: Option<&str>) -> Result<Session> {
    execute_command("timer::stop", || {
        let session = ctx.sessions.stop_timer()?;
        match note.map(str::trim).filter(|n| !n.is_empty()) {
            Some(note) => Ok(ctx.sessions.save_pending_note(note)?.unwrap_or(session)),
            None => {
                ctx.sessions.cancel_pending_note();
                Ok(session)
            }
        }
    })
}

pub fn timer_status(ctx: &AppContext) -> TimerStatus {
    ctx.sessions.timer_status()
}
