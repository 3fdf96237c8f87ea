//! # Lapse Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (state store, lock signal source, collaborator hooks)
//! - The session store and active timer
//! - The idle/away detector, detection monitor and reconciliation dialog
//!
//! ## Architecture Principles
//! - Only depends on `lapse-common` and `lapse-domain`
//! - No file system or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod idle;
pub mod tracking;

// Re-export specific items to avoid ambiguity
pub use idle::ports::{AwayCollaborator, LockHooks, LockSignalSource};
pub use idle::{
    AwaySummary, ChooserOption, DetectionMonitor, DialogView, IdleDetector, ProjectChooser,
    ReconciliationDialog, SignalOutcome,
};
pub use tracking::ports::{StateStore, WritePolicy};
pub use tracking::{LiveTimerDisplay, ProjectTotal, SessionStore, TimerStatus};
