//! Time utilities and abstractions
//!
//! - **[`clock`]**: real and mock wall clocks, in epoch milliseconds
//! - **[`format`]**: human-readable duration and timestamp labels
//! - **[`range`]**: half-open day/week/all-time ranges
//! - **[`timer`]**: recurring timers with cancellation (`runtime` feature)
//!
//! ## Usage
//!
//! ```rust
//! use lapse_common::time::{duration_label, Clock, MockClock};
//!
//! assert_eq!(duration_label(3661), "1h 1m 1s");
//!
//! let clock = MockClock::at(1_000);
//! clock.advance_ms(500);
//! assert_eq!(clock.now_millis(), 1_500);
//! ```

pub mod clock;
pub mod format;
pub mod range;
#[cfg(feature = "runtime")]
pub mod timer;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
pub use format::{
    clock_label, duration_label, duration_label_ms, format_timestamp, format_timestamp_in,
    round_millis_to_seconds,
};
pub use range::{
    all_time_bounds, day_bounds, day_bounds_in, week_bounds, week_bounds_in, TimeRange,
    DISTANT_FUTURE_MS,
};
#[cfg(feature = "runtime")]
pub use timer::{recurring, TimerHandle};
