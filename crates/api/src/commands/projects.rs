//! Project management commands

use chrono::NaiveDate;
use lapse_core::SessionStore;
use lapse_domain::{LapseError, Project, ProjectDraft, ProjectStatus, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Map a project id or (case-insensitive) name to its id
///
/// Unknown keys are returned unchanged so the store reports them; a blank
/// key stays blank.
///
/// # Errors
/// Returns `LapseError::Validation` when the name matches several projects.
pub fn resolve_project_id(store: &SessionStore, key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() || store.project(key).is_some() {
        return Ok(key.to_string());
    }

    let mut matches = store.projects().iter().filter(|p| p.name.trim().eq_ignore_ascii_case(key));
    match (matches.next(), matches.next()) {
        (Some(project), None) => Ok(project.id.clone()),
        (Some(_), Some(_)) => Err(LapseError::Validation(format!(
            "Several projects are named \"{key}\"; use the project id instead."
        ))),
        (None, _) => Ok(key.to_string()),
    }
}

pub fn list_projects(ctx: &AppContext, include_archived: bool) -> Vec<Project> {
    ctx.sessions
        .projects()
        .iter()
        .filter(|p| include_archived || !p.archived)
        .cloned()
        .collect()
}

pub fn add_project(ctx: &mut AppContext, draft: ProjectDraft) -> Result<Project> {
    execute_command("projects::add", || ctx.sessions.add_project(draft))
}

/// Field changes for [`edit_project`]; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectEdit {
    pub name: Option<String>,
    pub note: Option<String>,
    pub project_no: Option<String>,
    pub task_no: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
}

impl ProjectEdit {
    fn apply_to(self, current: &Project) -> ProjectDraft {
        ProjectDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            note: self.note.unwrap_or_else(|| current.note.clone()),
            project_no: self.project_no.unwrap_or_else(|| current.project_no.clone()),
            task_no: self.task_no.unwrap_or_else(|| current.task_no.clone()),
            start_date: self.start_date.or(current.start_date),
            end_date: self.end_date.or(current.end_date),
            status: self.status.unwrap_or(current.status),
        }
    }
}

pub fn edit_project(ctx: &mut AppContext, project: &str, edit: ProjectEdit) -> Result<Project> {
    execute_command("projects::edit", || {
        let id = resolve_project_id(&ctx.sessions, project)?;
        let current = ctx
            .sessions
            .project(&id)
            .ok_or_else(|| LapseError::NotFound(format!("project {id}")))?;
        let draft = edit.apply_to(current);
        ctx.sessions.update_project(&id, draft)
    })
}

pub fn set_project_archived(ctx: &mut AppContext, project: &str, archived: bool) -> Result<()> {
    let command = if archived { "projects::archive" } else { "projects::unarchive" };
    execute_command(command, || {
        let id = resolve_project_id(&ctx.sessions, project)?;
        ctx.sessions.set_archived(&id, archived)
    })
}

/// Delete a project and every session attributed to it
///
/// Returns the number of sessions removed with it.
pub fn delete_project(ctx: &mut AppContext, project: &str) -> Result<usize> {
    execute_command("projects::delete", || {
        let id = resolve_project_id(&ctx.sessions, project)?;
        ctx.sessions.remove_project(&id)
    })
}
