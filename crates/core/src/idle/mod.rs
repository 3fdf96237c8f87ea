//! Screen-lock driven away detection and reconciliation
//!
//! - **[`detector`]**: the lock/unlock state machine and its away queue
//! - **[`monitor`]**: permission handling and the platform subscription
//! - **[`reconciliation`]**: the dialog that resolves queued away intervals

pub mod detector;
pub mod monitor;
pub mod ports;
pub mod reconciliation;
mod session_hooks;

pub use detector::{IdleDetector, SignalOutcome};
pub use monitor::DetectionMonitor;
pub use reconciliation::{AwaySummary, ChooserOption, DialogView, ProjectChooser, ReconciliationDialog};
