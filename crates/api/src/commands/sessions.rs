//! Session commands

use lapse_domain::{Result, Session, SessionDraft, SessionPatch, SessionSource};

use super::projects::resolve_project_id;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Record a manual session for a project given by id or name
pub fn add_session(
    ctx: &mut AppContext,
    project: &str,
    start: i64,
    end: i64,
    note: &str,
) -> Result<Session> {
    execute_command("sessions::add", || {
        let project_id = resolve_project_id(&ctx.sessions, project)?;
        ctx.sessions.add_session(SessionDraft {
            project_id,
            start,
            end,
            note: note.to_string(),
            source: SessionSource::Manual,
        })
    })
}

/// Apply a partial edit; `patch.project_id` may be a project name
pub fn edit_session(ctx: &mut AppContext, id: &str, mut patch: SessionPatch) -> Result<Session> {
    execute_command("sessions::edit", || {
        if let Some(project) = patch.project_id.take() {
            patch.project_id = Some(resolve_project_id(&ctx.sessions, &project)?);
        }
        ctx.sessions.edit_session(id, &patch)
    })
}

pub fn remove_session(ctx: &mut AppContext, id: &str) -> Result<Session> {
    execute_command("sessions::remove", || ctx.sessions.remove_session(id))
}

/// Sessions newest first, optionally limited to one project
pub fn list_sessions(ctx: &AppContext, project: Option<&str>) -> Result<Vec<Session>> {
    let project_id = project.map(|p| resolve_project_id(&ctx.sessions, p)).transpose()?;
    let mut sessions: Vec<Session> = ctx
        .sessions
        .sessions()
        .iter()
        .filter(|s| project_id.as_deref().map_or(true, |id| s.project_id == id))
        .cloned()
        .collect();
    sessions.sort_by(|a, b| b.start.cmp(&a.start));
    Ok(sessions)
}
