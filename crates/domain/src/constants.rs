//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Storage keys
pub const TRACKER_STORAGE_KEY: &str = "tt_v1";
pub const IDLE_STORAGE_KEY: &str = "tt_idle_tracker_v1";

// Idle detection
pub const DEFAULT_IDLE_THRESHOLD_MS: u64 = 60_000;
pub const DEFAULT_AWAY_THRESHOLD_MS: u64 = 60_000;

// Persistence
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

// Live timer display
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;
pub const MAX_TICK_INTERVAL_MS: u64 = 250;

// Display labels
pub const UNKNOWN_PROJECT_LABEL: &str = "Unknown Project";
pub const UNTITLED_PROJECT_LABEL: &str = "Untitled Project";
pub const ARCHIVED_SUFFIX: &str = " (Archived)";
pub const CHOOSER_PLACEHOLDER: &str = "Select project...";
