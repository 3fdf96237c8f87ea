//! The session store as the detector's and dialog's collaborator

use lapse_domain::{
    LockMeta, ProjectDraft, ProjectOption, Result, Session, SessionDraft, ShortAway,
};
use tracing::{debug, warn};

use super::ports::{AwayCollaborator, LockHooks};
use crate::tracking::SessionStore;

impl LockHooks for SessionStore {
    /// Suggest the project whose timer was running when the screen locked
    fn on_lock(&self) -> Option<LockMeta> {
        self.active_timer().map(|timer| LockMeta::for_project(timer.project_id.clone()))
    }

    fn on_short_away(&self, away: &ShortAway) {
        debug!(
            unlock_time = away.unlock_time,
            duration_ms = away.duration_ms,
            "short absence, timer left untouched"
        );
    }
}

impl AwayCollaborator for SessionStore {
    fn list_projects(&self) -> Vec<ProjectOption> {
        self.project_options()
    }

    fn create_project(&mut self, name: &str, note: &str) -> Option<ProjectOption> {
        match self.add_project(ProjectDraft::named(name, note)) {
            Ok(project) => Some(project.option()),
            Err(err) => {
                warn!(error = %err, "failed to create project for away interval");
                None
            }
        }
    }

    fn create_session(&mut self, draft: SessionDraft) -> Result<Session> {
        self.add_session(draft)
    }
}
