use std::io::Write;

use anyhow::{bail, Context};
use lapse_core::AwaySummary;
use lapse_domain::{ProjectDraft, SessionPatch};

use super::{
    output, AwayCommand, Command, ProjectFields, ProjectsCommand, SessionsCommand, TimerCommand,
};
use crate::commands::{self, ProjectEdit};
use crate::context::AppContext;

/// Run a one-shot command and write its result to `out`
///
/// # Errors
/// Returns command failures (validation, unknown ids, storage) and write
/// errors. `watch` is not handled here and is rejected.
pub fn dispatch(ctx: &mut AppContext, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Timer(command) => timer(ctx, command, out),
        Command::Sessions(command) => sessions(ctx, command, out),
        Command::Projects(command) => projects(ctx, command, out),
        Command::Away(command) => away(ctx, command, out),
        Command::Totals { range, date, include_archived } => {
            let report = commands::totals(ctx, range, date, include_archived);
            writeln!(out, "{}", output::totals(&report))?;
            Ok(())
        }
        Command::Signal { state } => {
            let outcome = commands::apply_signal(ctx, state);
            writeln!(out, "{}", output::signal_outcome(&outcome))?;
            Ok(())
        }
        Command::Export { format, output: path } => {
            let text = commands::export_record(ctx, format)?;
            match path {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    writeln!(out, "Exported to {}", path.display())?;
                }
                None => writeln!(out, "{text}")?,
            }
            Ok(())
        }
        Command::Import { file } => {
            let report = commands::import_file(ctx, &file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            writeln!(out, "{}", output::load_report(&report, &ctx.sessions))?;
            Ok(())
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("this deletes every project and session; pass --yes to confirm");
            }
            commands::clear_all(ctx)?;
            writeln!(out, "All data cleared")?;
            Ok(())
        }
        Command::Watch => bail!("watch runs as a long-lived process and cannot be dispatched"),
    }
}

fn timer(ctx: &mut AppContext, command: TimerCommand, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        TimerCommand::Start { project } => {
            let timer = commands::start_timer(ctx, &project)?;
            writeln!(out, "Started timing {}", ctx.sessions.project_label(&timer.project_id))?;
        }
        TimerCommand::Stop { note } => {
            let session = commands::stop_timer(ctx, note.as_deref())?;
            writeln!(out, "Recorded {}", output::session_line(&session, &ctx.sessions))?;
        }
        TimerCommand::Status => {
            let status = commands::timer_status(ctx);
            writeln!(out, "{}", output::timer_status(&status, &ctx.sessions))?;
        }
    }
    Ok(())
}

fn sessions(
    ctx: &mut AppContext,
    command: SessionsCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        SessionsCommand::Add { project, start, end, note } => {
            let session = commands::add_session(ctx, &project, start, end, &note)?;
            writeln!(out, "Added {}", output::session_line(&session, &ctx.sessions))?;
        }
        SessionsCommand::Edit { id, project, start, end, note } => {
            let patch = SessionPatch { project_id: project, start, end, note };
            let session = commands::edit_session(ctx, &id, patch)?;
            writeln!(out, "Updated {}", output::session_line(&session, &ctx.sessions))?;
        }
        SessionsCommand::Remove { id } => {
            let session = commands::remove_session(ctx, &id)?;
            writeln!(out, "Removed {}", output::session_line(&session, &ctx.sessions))?;
        }
        SessionsCommand::List { project } => {
            for session in commands::list_sessions(ctx, project.as_deref())? {
                writeln!(out, "{}", output::session_line(&session, &ctx.sessions))?;
            }
        }
    }
    Ok(())
}

fn projects(
    ctx: &mut AppContext,
    command: ProjectsCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        ProjectsCommand::Add { name, fields } => {
            let project = commands::add_project(ctx, new_project(name, fields))?;
            writeln!(out, "Created {}", output::project_line(&project))?;
        }
        ProjectsCommand::Edit { project, name, fields } => {
            let edit = ProjectEdit {
                name,
                note: fields.note,
                project_no: fields.project_no,
                task_no: fields.task_no,
                start_date: fields.start_date,
                end_date: fields.end_date,
                status: fields.status,
            };
            let project = commands::edit_project(ctx, &project, edit)?;
            writeln!(out, "Updated {}", output::project_line(&project))?;
        }
        ProjectsCommand::Archive { project } => {
            commands::set_project_archived(ctx, &project, true)?;
            writeln!(out, "Archived {project}")?;
        }
        ProjectsCommand::Unarchive { project } => {
            commands::set_project_archived(ctx, &project, false)?;
            writeln!(out, "Unarchived {project}")?;
        }
        ProjectsCommand::Delete { project } => {
            let removed = commands::delete_project(ctx, &project)?;
            writeln!(out, "Deleted {project} and {removed} session(s)")?;
        }
        ProjectsCommand::List { all } => {
            for project in commands::list_projects(ctx, all) {
                writeln!(out, "{}", output::project_line(&project))?;
            }
        }
    }
    Ok(())
}

fn new_project(name: String, fields: ProjectFields) -> ProjectDraft {
    ProjectDraft {
        name,
        project_no: fields.project_no.unwrap_or_default(),
        task_no: fields.task_no.unwrap_or_default(),
        start_date: fields.start_date,
        end_date: fields.end_date,
        status: fields.status.unwrap_or_default(),
        note: fields.note.unwrap_or_default(),
    }
}

fn away(ctx: &mut AppContext, command: AwayCommand, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        AwayCommand::Show => match commands::show_away(ctx)? {
            Some(prompt) => writeln!(out, "{}", output::away_prompt(&prompt))?,
            None => writeln!(out, "Nothing to reconcile")?,
        },
        AwayCommand::Discard => {
            let discarded = commands::discard_away(ctx)?;
            let summary = AwaySummary::from_pending(&discarded);
            writeln!(out, "Discarded: {}", summary.headline)?;
        }
        AwayCommand::Allocate { project, note } => {
            let session = commands::allocate_away(ctx, &project, &note)?;
            writeln!(out, "Recorded {}", output::session_line(&session, &ctx.sessions))?;
        }
        AwayCommand::Create { name, note } => {
            let session = commands::create_and_allocate_away(ctx, &name, &note)?;
            writeln!(out, "Recorded {}", output::session_line(&session, &ctx.sessions))?;
        }
    }
    Ok(())
}
