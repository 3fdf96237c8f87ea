//! Away reconciliation commands
//!
//! Each command drives the reconciliation dialog through one complete
//! interaction: open on the head of the away queue, pick a path, confirm.

use lapse_core::{AwaySummary, ProjectChooser};
use lapse_domain::{LapseError, PendingAway, Result, Session};

use super::projects::resolve_project_id;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// The away interval awaiting a decision, as the dialog presents it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwayPrompt {
    pub summary: AwaySummary,
    pub chooser: ProjectChooser,
    /// Intervals waiting, this one included
    pub queued: usize,
}

/// Describe the head of the away queue, `None` when nothing is pending
pub fn show_away(ctx: &mut AppContext) -> Result<Option<AwayPrompt>> {
    execute_command("away::show", || {
        let Some(summary) = ctx.dialog.open(&ctx.detector).cloned() else {
            return Ok(None);
        };
        let chooser = ctx.dialog.show_allocate(&ctx.detector, &ctx.sessions)?;
        ctx.dialog.back();
        Ok(Some(AwayPrompt { summary, chooser, queued: ctx.detector.pending_count() }))
    })
}

/// Drop the head of the away queue without recording it
pub fn discard_away(ctx: &mut AppContext) -> Result<PendingAway> {
    execute_command("away::discard", || {
        ctx.dialog.open(&ctx.detector);
        ctx.dialog.discard(&mut ctx.detector, &mut ctx.sessions)
    })
}

/// Record the head of the away queue against an existing project
pub fn allocate_away(ctx: &mut AppContext, project: &str, note: &str) -> Result<Session> {
    execute_command("away::allocate", || {
        let project_id = resolve_project_id(&ctx.sessions, project)?;
        ctx.dialog.open(&ctx.detector);
        ctx.dialog.show_allocate(&ctx.detector, &ctx.sessions)?;
        ctx.dialog.select_project(&project_id);
        ctx.dialog.set_note(note);
        ctx.dialog.confirm_allocate(&mut ctx.detector, &mut ctx.sessions)
    })
}

/// Create a project and record the head of the away queue against it
pub fn create_and_allocate_away(ctx: &mut AppContext, name: &str, note: &str) -> Result<Session> {
    execute_command("away::create", || {
        ctx.dialog.open(&ctx.detector);
        ctx.dialog.show_create(&ctx.detector)?;
        ctx.dialog.set_project_name(name);
        ctx.dialog.set_note(note);
        ctx.dialog
            .confirm_create(&mut ctx.detector, &mut ctx.sessions)?
            .ok_or_else(|| LapseError::Internal("project could not be created".into()))
    })
}
