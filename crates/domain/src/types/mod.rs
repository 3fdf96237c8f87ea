//! Domain types and models

pub mod idle;
pub mod project;
pub mod session;
pub mod timer;
pub mod tracker;

pub use idle::{
    IdleRecord, IdleStatus, IdleTrackerState, LockMeta, LockPhase, PendingAway, PermissionState,
    ScreenState, ShortAway,
};
pub use project::{Project, ProjectDraft, ProjectOption, ProjectStatus};
pub use session::{session_seconds, validate_interval, Session, SessionDraft, SessionPatch, SessionSource};
pub use timer::ActiveTimer;
pub use tracker::{LoadReport, TrackerRecord};
