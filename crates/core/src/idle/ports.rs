//! Port interfaces for away detection
//!
//! [`LockSignalSource`] is implemented by platform adapters in
//! `lapse-infra`. [`LockHooks`] and [`AwayCollaborator`] are the callbacks
//! the detector and the reconciliation dialog use to reach the rest of the
//! application; they are passed per call rather than stored.

use async_trait::async_trait;
use lapse_domain::{
    LockMeta, PermissionState, ProjectOption, Result, ScreenState, Session, SessionDraft, ShortAway,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Platform source of screen lock/unlock transitions
#[async_trait]
pub trait LockSignalSource: Send + Sync {
    /// Whether the platform can report screen state at all
    fn is_supported(&self) -> bool;

    /// Current permission state, without prompting
    async fn permission(&self) -> PermissionState;

    /// Ask the user for permission
    async fn request_permission(&self) -> Result<PermissionState>;

    /// Start delivering screen state changes until `cancel` fires
    ///
    /// `threshold_ms` is the platform's own idle threshold.
    async fn subscribe(
        &self,
        threshold_ms: u64,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<ScreenState>>;
}

/// Callbacks invoked by the idle detector
pub trait LockHooks {
    /// Snapshot to keep with the lock; its `projectId` becomes the away
    /// interval's project suggestion
    fn on_lock(&self) -> Option<LockMeta>;

    /// An unlock that came back before the away threshold
    fn on_short_away(&self, _away: &ShortAway) {}
}

/// Collaborator contract of the reconciliation dialog
pub trait AwayCollaborator {
    /// Every project, archived ones included
    fn list_projects(&self) -> Vec<ProjectOption>;

    /// Create a project; `None` (or an option with an empty id) aborts the
    /// create-then-allocate flow
    fn create_project(&mut self, name: &str, note: &str) -> Option<ProjectOption>;

    /// Record the session covering an away interval
    fn create_session(&mut self, draft: SessionDraft) -> Result<Session>;

    fn on_discard(&mut self) {}

    fn on_allocate(&mut self, _project_id: &str) {}
}
