//! Active timer operations
//!
//! The timer lives inside the tracker record, so its operations are
//! implemented on [`SessionStore`]. Timer transitions are written
//! immediately; the running timer must survive a crash right after start.

use lapse_domain::{ActiveTimer, LapseError, Result, Session, SessionDraft, SessionSource};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ports::WritePolicy;
use super::session_store::{new_id, SessionStore};

/// Current state of the timer, computed from absolute timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerStatus {
    Idle,
    Running { project_id: String, start: i64, elapsed_ms: i64 },
}

impl SessionStore {
    /// Start timing `project_id`
    ///
    /// # Errors
    /// - `LapseError::NoProjectSelected` when `project_id` is blank
    /// - `LapseError::AlreadyRunning` when a timer is active
    /// - `LapseError::Validation` when the project is unknown or archived
    pub fn start_timer(&mut self, project_id: &str) -> Result<ActiveTimer> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(LapseError::NoProjectSelected);
        }
        if let Some(active) = &self.record.active_timer {
            return Err(LapseError::AlreadyRunning(active.project_id.clone()));
        }
        let project = self.require_project(project_id)?;
        if project.archived {
            return Err(LapseError::Validation(format!(
                "Project {} is archived",
                project.display_name()
            )));
        }

        let timer = ActiveTimer::new(project_id, self.clock.now_millis());
        self.record.active_timer = Some(timer.clone());
        self.pending_note = None;
        info!(project_id = %timer.project_id, start = timer.start, "timer started");
        self.persist(WritePolicy::Immediate);
        Ok(timer)
    }

    /// Stop the timer and record a `timer` session
    ///
    /// The new session is marked as awaiting a note until
    /// [`save_pending_note`](Self::save_pending_note) or
    /// [`cancel_pending_note`](Self::cancel_pending_note) is called.
    ///
    /// # Errors
    /// - `LapseError::NotRunning` when no timer is active
    /// - `LapseError::Validation` when the timed project no longer exists;
    ///   the timer is discarded
    pub fn stop_timer(&mut self) -> Result<Session> {
        let timer = self.record.active_timer.clone().ok_or(LapseError::NotRunning)?;
        if let Err(err) = self.require_project(&timer.project_id).map(|_| ()) {
            warn!(project_id = %timer.project_id, "discarding timer for missing project");
            self.record.active_timer = None;
            self.persist(WritePolicy::Immediate);
            return Err(err);
        }
        let now = self.clock.now_millis();
        // A clock that went backwards still yields a one-second session.
        let end = now.max(timer.start.saturating_add(1));

        let session = Session::from_draft(
            new_id(),
            SessionDraft {
                project_id: timer.project_id,
                start: timer.start,
                end,
                note: String::new(),
                source: SessionSource::Timer,
            },
        )?;

        self.record.active_timer = None;
        self.record.sessions.push(session.clone());
        self.pending_note = Some(session.id.clone());
        info!(
            session_id = %session.id,
            project_id = %session.project_id,
            seconds = session.seconds,
            "timer stopped"
        );
        self.persist(WritePolicy::Immediate);
        Ok(session)
    }

    /// Re-enter the running state after a restart
    ///
    /// The stored start instant is left untouched, so elapsed time keeps
    /// counting across the restart.
    pub fn resume_timer(&self) -> Option<&ActiveTimer> {
        let timer = self.record.active_timer.as_ref()?;
        info!(
            project_id = %timer.project_id,
            elapsed_ms = timer.elapsed_ms(self.clock.now_millis()),
            "resuming active timer"
        );
        Some(timer)
    }

    pub fn active_timer(&self) -> Option<&ActiveTimer> {
        self.record.active_timer.as_ref()
    }

    /// Timer state as of now
    pub fn timer_status(&self) -> TimerStatus {
        match &self.record.active_timer {
            Some(timer) => TimerStatus::Running {
                project_id: timer.project_id.clone(),
                start: timer.start,
                elapsed_ms: timer.elapsed_ms(self.clock.now_millis()),
            },
            None => TimerStatus::Idle,
        }
    }

    /// Milliseconds since the timer started, `None` when idle
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.record.active_timer.as_ref().map(|t| t.elapsed_ms(self.clock.now_millis()))
    }

    /// The session created by the last stop, while its note is outstanding
    pub fn pending_note_session(&self) -> Option<&Session> {
        self.pending_note.as_deref().and_then(|id| self.session(id))
    }

    /// Attach `note` to the session awaiting one
    ///
    /// Returns `Ok(None)` when nothing is awaiting a note.
    ///
    /// # Errors
    /// Propagates store errors from the note update.
    pub fn save_pending_note(&mut self, note: &str) -> Result<Option<Session>> {
        let Some(id) = self.pending_note.take() else {
            return Ok(None);
        };
        if self.session(&id).is_none() {
            debug!(session_id = %id, "pending note target no longer exists");
            return Ok(None);
        }
        self.set_session_note(&id, note)?;
        Ok(self.session(&id).cloned())
    }

    /// Drop the outstanding note request, leaving the session's note empty
    pub fn cancel_pending_note(&mut self) {
        if let Some(id) = self.pending_note.take() {
            debug!(session_id = %id, "pending note cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lapse_common::time::MockClock;
    use lapse_domain::{ProjectDraft, Result as DomainResult};
    use serde_json::Value;

    use super::*;
    use crate::tracking::ports::StateStore;

    struct NullStore;

    impl StateStore for NullStore {
        fn load(&self, _key: &str) -> DomainResult<Option<Value>> {
            Ok(None)
        }

        fn save(&self, _key: &str, _payload: &Value, _policy: WritePolicy) -> DomainResult<()> {
            Ok(())
        }
    }

    /// Validates the start/stop cycle against a mock clock.
    ///
    /// Assertions:
    /// - Elapsed time is derived from the stored start.
    /// - The stopped session rounds to whole seconds and awaits a note.
    #[test]
    fn test_start_stop_cycle() {
        let clock = MockClock::at(1_000_000);
        let mut store = SessionStore::load(Arc::new(NullStore), Arc::new(clock.clone()));
        let project = store.add_project(ProjectDraft::named("Docs", "")).expect("project");

        store.start_timer(&project.id).expect("start");
        clock.advance_ms(61_600);
        assert_eq!(store.elapsed_ms(), Some(61_600));

        let session = store.stop_timer().expect("stop");
        assert_eq!(session.seconds, 62);
        assert_eq!(session.source, SessionSource::Timer);
        assert_eq!(store.pending_note_session().map(|s| s.id.as_str()), Some(session.id.as_str()));
        assert_eq!(store.timer_status(), TimerStatus::Idle);

        let noted = store.save_pending_note("  reviewed PR ").expect("note").expect("session");
        assert_eq!(noted.note, "reviewed PR");
        assert!(store.pending_note_session().is_none());
    }

    #[test]
    fn test_start_errors() {
        let clock = MockClock::at(0);
        let mut store = SessionStore::load(Arc::new(NullStore), Arc::new(clock));
        assert_eq!(store.start_timer(" "), Err(LapseError::NoProjectSelected));
        assert!(matches!(store.start_timer("missing"), Err(LapseError::Validation(_))));
        assert_eq!(store.stop_timer(), Err(LapseError::NotRunning));

        let project = store.add_project(ProjectDraft::named("Docs", "")).expect("project");
        store.start_timer(&project.id).expect("start");
        assert!(matches!(store.start_timer(&project.id), Err(LapseError::AlreadyRunning(_))));
    }

    #[test]
    fn test_instant_stop_records_one_second() {
        let clock = MockClock::at(5_000);
        let mut store = SessionStore::load(Arc::new(NullStore), Arc::new(clock));
        let project = store.add_project(ProjectDraft::named("Docs", "")).expect("project");
        store.start_timer(&project.id).expect("start");

        let session = store.stop_timer().expect("stop");
        assert_eq!(session.seconds, 1);
        assert!(session.end > session.start);
    }
}
