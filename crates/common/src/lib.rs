//! Common utilities shared across Lapse crates.
//!
//! # Feature Tiers
//!
//! - always on: clock abstraction, duration labels, range bounds
//! - `runtime`: tokio-backed recurring timers with cancellation

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

// Re-export commonly used types for convenience
pub use time::{
    all_time_bounds, clock_label, day_bounds, duration_label, duration_label_ms,
    format_timestamp, week_bounds, Clock, MockClock, SystemClock, TimeRange,
};
