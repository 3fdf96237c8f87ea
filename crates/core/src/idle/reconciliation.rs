//! Away reconciliation dialog controller
//!
//! Presents the head of the detector's away queue and resolves it in one of
//! three ways: discard it, allocate it to an existing project, or create a
//! project and allocate it there. Resolution always goes through the
//! detector, which persists the shorter queue immediately; the next queued
//! interval (if any) is then presented from the base view.

use lapse_common::time::{duration_label_ms, format_timestamp};
use lapse_domain::constants::CHOOSER_PLACEHOLDER;
use lapse_domain::{LapseError, PendingAway, Result, Session, SessionDraft, SessionSource};
use tracing::{info, warn};

use super::detector::IdleDetector;
use super::ports::AwayCollaborator;

/// Which part of the dialog is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogView {
    #[default]
    Closed,
    Base,
    AllocateToExisting { selection: String, note: String },
    CreateThenAllocate { name: String, note: String },
}

/// Rendered description of an away interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaySummary {
    /// `Away for <duration>`
    pub headline: String,
    /// `From <start> to <end>`, empty when either end is unrepresentable
    pub detail: String,
    pub project_suggestion: Option<String>,
}

impl AwaySummary {
    pub fn from_pending(pending: &PendingAway) -> Self {
        let duration = i64::try_from(pending.duration_ms).unwrap_or(i64::MAX);
        let from = format_timestamp(pending.lock_start);
        let to = format_timestamp(pending.unlock_time);
        let detail =
            if from.is_empty() || to.is_empty() { String::new() } else { format!("From {from} to {to}") };

        Self {
            headline: format!("Away for {}", duration_label_ms(duration)),
            detail,
            project_suggestion: pending.project_suggestion.clone(),
        }
    }
}

/// One entry of the project chooser; the placeholder has an empty value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserOption {
    pub value: String,
    pub label: String,
}

/// Project chooser shown by the allocate view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChooser {
    pub options: Vec<ChooserOption>,
    /// Value of the selected option; empty while the placeholder is selected
    pub selected: String,
}

/// Controller for the away reconciliation dialog
#[derive(Debug, Default)]
pub struct ReconciliationDialog {
    view: DialogView,
    summary: Option<AwaySummary>,
}

impl ReconciliationDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn view(&self) -> &DialogView {
        &self.view
    }

    pub const fn summary(&self) -> Option<&AwaySummary> {
        self.summary.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.view != DialogView::Closed
    }

    /// Present the detector's current away interval at the base view
    ///
    /// Leaves the dialog closed when nothing is pending.
    pub fn open(&mut self, detector: &IdleDetector) -> Option<&AwaySummary> {
        match detector.pending() {
            Some(pending) => {
                self.summary = Some(AwaySummary::from_pending(pending));
                self.view = DialogView::Base;
            }
            None => self.close(),
        }
        self.summary.as_ref()
    }

    /// Hide the dialog; the away interval stays queued
    pub fn close(&mut self) {
        self.view = DialogView::Closed;
        self.summary = None;
    }

    /// Return to the base view without resolving anything
    pub fn back(&mut self) {
        if self.is_open() {
            self.view = DialogView::Base;
        }
    }

    /// Switch to the allocate view and build its chooser
    ///
    /// The suggested project is pre-selected when the collaborator lists it;
    /// otherwise the placeholder stays selected.
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` when no away interval is pending.
    pub fn show_allocate(
        &mut self,
        detector: &IdleDetector,
        collaborator: &dyn AwayCollaborator,
    ) -> Result<ProjectChooser> {
        let pending = require_pending(detector)?;
        let projects = collaborator.list_projects();

        let selected = pending
            .project_suggestion
            .as_deref()
            .filter(|id| projects.iter().any(|p| p.id == *id))
            .unwrap_or_default()
            .to_string();

        let options = std::iter::once(ChooserOption {
            value: String::new(),
            label: CHOOSER_PLACEHOLDER.to_string(),
        })
        .chain(projects.iter().map(|p| ChooserOption { value: p.id.clone(), label: p.label() }))
        .collect();

        self.view = DialogView::AllocateToExisting { selection: selected.clone(), note: String::new() };
        Ok(ProjectChooser { options, selected })
    }

    /// Switch to the create-then-allocate view with empty inputs
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` when no away interval is pending.
    pub fn show_create(&mut self, detector: &IdleDetector) -> Result<()> {
        require_pending(detector)?;
        self.view = DialogView::CreateThenAllocate { name: String::new(), note: String::new() };
        Ok(())
    }

    /// Change the chooser selection in the allocate view
    pub fn select_project(&mut self, project_id: &str) {
        if let DialogView::AllocateToExisting { selection, .. } = &mut self.view {
            project_id.clone_into(selection);
        }
    }

    /// Set the project name in the create view
    pub fn set_project_name(&mut self, project_name: &str) {
        if let DialogView::CreateThenAllocate { name, .. } = &mut self.view {
            project_name.clone_into(name);
        }
    }

    /// Set the note of whichever form is showing
    pub fn set_note(&mut self, text: &str) {
        match &mut self.view {
            DialogView::AllocateToExisting { note, .. } | DialogView::CreateThenAllocate { note, .. } => {
                text.clone_into(note);
            }
            DialogView::Closed | DialogView::Base => {}
        }
    }

    /// Drop the presented away interval without recording it
    ///
    /// # Errors
    /// Returns `LapseError::NotFound` when no away interval is pending; the
    /// dialog is closed in that case.
    pub fn discard(
        &mut self,
        detector: &mut IdleDetector,
        collaborator: &mut dyn AwayCollaborator,
    ) -> Result<PendingAway> {
        let Some(discarded) = detector.resolve_pending() else {
            self.close();
            return Err(no_pending());
        };
        info!(
            lock_start = discarded.lock_start,
            duration_ms = discarded.duration_ms,
            "away interval discarded"
        );
        collaborator.on_discard();
        self.open(detector);
        Ok(discarded)
    }

    /// Record the presented interval against the selected project
    ///
    /// # Errors
    /// - `LapseError::Validation` when the allocate view is not showing or
    ///   no project is selected; nothing changes
    /// - any error from `create_session`; the interval stays pending
    pub fn confirm_allocate(
        &mut self,
        detector: &mut IdleDetector,
        collaborator: &mut dyn AwayCollaborator,
    ) -> Result<Session> {
        let DialogView::AllocateToExisting { selection, note } = &self.view else {
            return Err(LapseError::Validation("Choose a project to allocate this time.".into()));
        };
        let project_id = selection.trim().to_string();
        if project_id.is_empty() {
            return Err(LapseError::Validation("Select a project to allocate this time.".into()));
        }
        let note = note.trim().to_string();
        self.allocate(detector, collaborator, &project_id, note)
    }

    /// Create a project from the create view and allocate the interval to it
    ///
    /// Returns `Ok(None)` when the collaborator did not hand back a project
    /// with an id; nothing is allocated in that case.
    ///
    /// # Errors
    /// - `LapseError::Validation` when the create view is not showing or the
    ///   name is blank
    /// - any error from `create_session`; the interval stays pending
    pub fn confirm_create(
        &mut self,
        detector: &mut IdleDetector,
        collaborator: &mut dyn AwayCollaborator,
    ) -> Result<Option<Session>> {
        let DialogView::CreateThenAllocate { name, note } = &self.view else {
            return Err(LapseError::Validation("Provide a project name to continue.".into()));
        };
        let (name, note) = (name.trim().to_string(), note.trim().to_string());
        if name.is_empty() {
            return Err(LapseError::Validation("Provide a project name to continue.".into()));
        }
        require_pending(detector)?;

        let Some(project) = collaborator.create_project(&name, &note).filter(|p| !p.id.is_empty())
        else {
            warn!(project_name = %name, "create_project did not return a project with an id");
            return Ok(None);
        };

        self.allocate(detector, collaborator, &project.id, String::new()).map(Some)
    }

    fn allocate(
        &mut self,
        detector: &mut IdleDetector,
        collaborator: &mut dyn AwayCollaborator,
        project_id: &str,
        note: String,
    ) -> Result<Session> {
        let pending = require_pending(detector)?.clone();
        let session = collaborator.create_session(SessionDraft {
            project_id: project_id.to_string(),
            start: pending.lock_start,
            end: pending.unlock_time,
            note,
            source: SessionSource::IdleDetection,
        })?;

        detector.resolve_pending();
        info!(project_id, session_id = %session.id, seconds = session.seconds, "away interval allocated");
        collaborator.on_allocate(project_id);
        self.open(detector);
        Ok(session)
    }
}

fn require_pending(detector: &IdleDetector) -> Result<&PendingAway> {
    detector.pending().ok_or_else(no_pending)
}

fn no_pending() -> LapseError {
    LapseError::NotFound("pending away interval".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_headline_and_detail() {
        let pending = PendingAway::new(0, 3_661_000, None);
        let summary = AwaySummary::from_pending(&pending);
        assert_eq!(summary.headline, "Away for 1h 1m 1s");
        assert!(summary.detail.starts_with("From "));
        assert!(summary.detail.contains(" to "));
    }

    #[test]
    fn test_inputs_only_apply_to_matching_view() {
        let mut dialog = ReconciliationDialog::new();
        dialog.set_note("ignored");
        dialog.select_project("p1");
        assert_eq!(dialog.view(), &DialogView::Closed);

        dialog.view = DialogView::CreateThenAllocate { name: String::new(), note: String::new() };
        dialog.set_project_name("Research");
        dialog.set_note("offsite");
        dialog.select_project("p1");
        assert_eq!(
            dialog.view(),
            &DialogView::CreateThenAllocate { name: "Research".into(), note: "offsite".into() }
        );

        dialog.back();
        assert_eq!(dialog.view(), &DialogView::Base);
    }
}
