//! Session store - projects, sessions and the running timer
//!
//! The store owns the in-memory [`TrackerRecord`] and is the only writer of
//! the `tt_v1` key. In-memory state is authoritative: every mutation is
//! applied first and then handed to the [`StateStore`], whose failures are
//! logged and never surfaced to the caller.

use std::sync::Arc;

use lapse_common::time::{Clock, TimeRange};
use lapse_common::duration_label;
use lapse_domain::constants::{TRACKER_STORAGE_KEY, UNKNOWN_PROJECT_LABEL};
use lapse_domain::{
    LapseError, LoadReport, Project, ProjectDraft, ProjectOption, Result, Session, SessionDraft,
    SessionPatch, TrackerRecord,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ports::{StateStore, WritePolicy};

/// Per-project aggregate over a time range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectTotal {
    pub project_id: String,
    pub project_name: String,
    pub session_count: usize,
    pub total_seconds: u64,
}

impl ProjectTotal {
    /// Total rendered as `"<h>h <m>m <s>s"`
    pub fn label(&self) -> String {
        duration_label(self.total_seconds)
    }
}

/// Owner of the tracker record
pub struct SessionStore {
    store: Arc<dyn StateStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) record: TrackerRecord,
    pub(crate) pending_note: Option<String>,
}

impl SessionStore {
    /// Load the tracker record from `store`
    ///
    /// Never fails: unreadable state is replaced by an empty record and
    /// malformed elements are dropped with a warning.
    pub fn load(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        let record = match store.load(TRACKER_STORAGE_KEY) {
            Ok(Some(value)) => {
                let (record, report) = TrackerRecord::from_value_lenient(&value);
                log_load_report(&report);
                record
            }
            Ok(None) => TrackerRecord::default(),
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "failed to read tracker state");
                TrackerRecord::default()
            }
        };

        debug!(
            projects = record.projects.len(),
            sessions = record.sessions.len(),
            timer_running = record.active_timer.is_some(),
            "tracker state loaded"
        );

        Self { store, clock, record, pending_note: None }
    }

    /// Snapshot of everything the store holds
    pub const fn record(&self) -> &TrackerRecord {
        &self.record
    }

    pub fn projects(&self) -> &[Project] {
        &self.record.projects
    }

    pub fn sessions(&self) -> &[Session] {
        &self.record.sessions
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.record.projects.iter().find(|p| p.id == id)
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.record.sessions.iter().find(|s| s.id == id)
    }

    /// Display name for a project id; dangling ids read `Unknown Project`
    pub fn project_label(&self, id: &str) -> &str {
        self.project(id).map_or(UNKNOWN_PROJECT_LABEL, Project::display_name)
    }

    /// Chooser entries for every project, archived ones included
    pub fn project_options(&self) -> Vec<ProjectOption> {
        self.record.projects.iter().map(Project::option).collect()
    }

    /// Sessions attributed to `project_id`, in insertion order
    pub fn sessions_for_project<'a>(
        &'a self,
        project_id: &'a str,
    ) -> impl Iterator<Item = &'a Session> + 'a {
        self.record.sessions.iter().filter(move |s| s.project_id == project_id)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Create a project
    ///
    /// # Errors
    /// Returns `LapseError::Validation` if the name is blank.
    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<Project> {
        require_name(&draft)?;
        let project = Project::from_draft(new_id(), draft);
        self.record.projects.push(project.clone());
        info!(project_id = %project.id, "project created");
        self.persist(WritePolicy::Debounced);
        Ok(project)
    }

    /// Replace the editable fields of a project, keeping its archive flag
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id and
    /// `LapseError::Validation` if the name is blank.
    pub fn update_project(&mut self, id: &str, draft: ProjectDraft) -> Result<Project> {
        require_name(&draft)?;
        let project = self.project_mut(id)?;
        let archived = project.archived;
        *project = Project { archived, ..Project::from_draft(id, draft) };
        let updated = project.clone();
        self.persist(WritePolicy::Debounced);
        Ok(updated)
    }

    /// Archive or restore a project
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id.
    pub fn set_archived(&mut self, id: &str, archived: bool) -> Result<()> {
        let project = self.project_mut(id)?;
        if project.archived != archived {
            project.archived = archived;
            info!(project_id = %id, archived, "project archive flag changed");
            self.persist(WritePolicy::Debounced);
        }
        Ok(())
    }

    /// Flip the archive flag, returning the new value
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id.
    pub fn toggle_archived(&mut self, id: &str) -> Result<bool> {
        let archived = !self.project(id).ok_or_else(|| project_not_found(id))?.archived;
        self.set_archived(id, archived)?;
        Ok(archived)
    }

    /// Delete a project and every session attributed to it
    ///
    /// Returns the number of sessions removed with it. A timer running on
    /// the project is discarded without recording a session.
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id.
    pub fn remove_project(&mut self, id: &str) -> Result<usize> {
        let before = self.record.projects.len();
        self.record.projects.retain(|p| p.id != id);
        if self.record.projects.len() == before {
            return Err(project_not_found(id));
        }
        let removed = self.drop_sessions_where(|s| s.project_id == id);
        let timer_dropped =
            self.record.active_timer.as_ref().is_some_and(|t| t.project_id == id);
        if timer_dropped {
            self.record.active_timer = None;
        }
        info!(project_id = %id, sessions_removed = removed, timer_dropped, "project deleted");
        self.persist(if timer_dropped { WritePolicy::Immediate } else { WritePolicy::Debounced });
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Record a completed session
    ///
    /// # Errors
    /// Returns `LapseError::Validation` when the interval is not strictly
    /// positive, the project id is empty, or the project does not exist.
    pub fn add_session(&mut self, draft: SessionDraft) -> Result<Session> {
        self.require_project(&draft.project_id)?;
        let session = Session::from_draft(new_id(), draft)?;
        self.record.sessions.push(session.clone());
        debug!(
            session_id = %session.id,
            project_id = %session.project_id,
            seconds = session.seconds,
            source = %session.source,
            "session recorded"
        );
        self.persist(WritePolicy::Debounced);
        Ok(session)
    }

    /// Apply `patch` to a stored session, re-deriving its seconds
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id and
    /// `LapseError::Validation` for an invalid result; in both cases the
    /// stored session is unchanged.
    pub fn edit_session(&mut self, id: &str, patch: &SessionPatch) -> Result<Session> {
        if let Some(project_id) = patch.project_id.as_deref() {
            self.require_project(project_id)?;
        }
        let index = self.session_index(id)?;
        let updated = self.record.sessions[index].patched(patch)?;
        self.record.sessions[index] = updated.clone();
        self.persist(WritePolicy::Debounced);
        Ok(updated)
    }

    /// Replace the note of a stored session
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id.
    pub fn set_session_note(&mut self, id: &str, note: &str) -> Result<()> {
        self.edit_session(id, &SessionPatch::note(note)).map(|_| ())
    }

    /// Delete a single session
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` for an unknown id.
    pub fn remove_session(&mut self, id: &str) -> Result<Session> {
        let index = self.session_index(id)?;
        let removed = self.record.sessions.remove(index);
        if self.pending_note.as_deref() == Some(id) {
            self.pending_note = None;
        }
        self.persist(WritePolicy::Debounced);
        Ok(removed)
    }

    /// Delete every session attributed to `project_id`
    pub fn remove_sessions_for_project(&mut self, project_id: &str) -> usize {
        let removed = self.drop_sessions_where(|s| s.project_id == project_id);
        if removed > 0 {
            self.persist(WritePolicy::Debounced);
        }
        removed
    }

    /// Per-project totals for sessions starting inside `range`
    ///
    /// Rows follow project insertion order. Archived projects are skipped
    /// unless `include_archived` is set; sessions of unknown projects never
    /// appear.
    pub fn totals_for_range(&self, range: TimeRange, include_archived: bool) -> Vec<ProjectTotal> {
        self.record
            .projects
            .iter()
            .filter(|p| include_archived || !p.archived)
            .map(|project| {
                let (session_count, total_seconds) = self
                    .sessions_for_project(&project.id)
                    .filter(|s| range.contains(s.start))
                    .fold((0, 0), |(count, total), s| (count + 1, total + s.seconds));
                ProjectTotal {
                    project_id: project.id.clone(),
                    project_name: project.display_name().to_string(),
                    session_count,
                    total_seconds,
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------

    /// Replace the whole record with imported data
    ///
    /// Import is as lenient as loading; the report says what was dropped.
    pub fn replace_all(&mut self, value: &Value) -> LoadReport {
        let (record, report) = TrackerRecord::from_value_lenient(value);
        log_load_report(&report);
        info!(
            projects = record.projects.len(),
            sessions = record.sessions.len(),
            "tracker state replaced by import"
        );
        self.record = record;
        self.pending_note = None;
        self.persist(WritePolicy::Debounced);
        report
    }

    /// Forget every project, session and the running timer
    pub fn clear_all(&mut self) {
        self.record = TrackerRecord::default();
        self.pending_note = None;
        warn!("all tracker data cleared");
        self.persist(WritePolicy::Immediate);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(crate) fn persist(&self, policy: WritePolicy) {
        let payload = match serde_json::to_value(&self.record) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize tracker state");
                return;
            }
        };
        if let Err(err) = self.store.save(TRACKER_STORAGE_KEY, &payload, policy) {
            warn!(
                error = %err,
                error_type = err.label(),
                policy = ?policy,
                "failed to persist tracker state"
            );
        }
    }

    pub(crate) fn require_project(&self, project_id: &str) -> Result<&Project> {
        let trimmed = project_id.trim();
        if trimmed.is_empty() {
            return Err(LapseError::Validation("Select a project for this session.".into()));
        }
        self.project(trimmed)
            .ok_or_else(|| LapseError::Validation(format!("Unknown project: {trimmed}")))
    }

    fn project_mut(&mut self, id: &str) -> Result<&mut Project> {
        self.record.projects.iter_mut().find(|p| p.id == id).ok_or_else(|| project_not_found(id))
    }

    fn session_index(&self, id: &str) -> Result<usize> {
        self.record
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| LapseError::NotFound(format!("session {id}")))
    }

    fn drop_sessions_where(&mut self, predicate: impl Fn(&Session) -> bool) -> usize {
        let before = self.record.sessions.len();
        let pending_note = self.pending_note.take();
        self.record.sessions.retain(|s| !predicate(s));
        self.pending_note = pending_note.filter(|id| self.session(id).is_some());
        before - self.record.sessions.len()
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn require_name(draft: &ProjectDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(LapseError::Validation("Project Name is required.".into()));
    }
    Ok(())
}

fn project_not_found(id: &str) -> LapseError {
    LapseError::NotFound(format!("project {id}"))
}

fn log_load_report(report: &LoadReport) {
    if !report.is_clean() {
        warn!(
            dropped_projects = report.dropped_projects,
            dropped_sessions = report.dropped_sessions,
            dropped_timer = report.dropped_timer,
            "discarded malformed tracker records"
        );
    }
}
