//! Wall-clock abstraction for testability
//!
//! Every timestamp in Lapse is an `i64` count of milliseconds since the UNIX
//! epoch. Components take an `Arc<dyn Clock>` so tests can drive time
//! deterministically with [`MockClock`].
//!
//! # Examples
//!
//! ```
//! use lapse_common::time::{Clock, MockClock, SystemClock};
//!
//! // Use system clock in production
//! let clock = SystemClock;
//! assert!(clock.now_millis() > 0);
//!
//! // Use mock clock in tests
//! let mock = MockClock::at(10_000);
//! mock.advance_ms(5_000);
//! assert_eq!(mock.now_millis(), 15_000);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, TimeZone};

/// Trait for wall-clock reads
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch
    fn now_millis(&self) -> i64;

    /// Current time in the local timezone
    ///
    /// Falls back to the epoch if the clock reports an unrepresentable value.
    fn now_local(&self) -> DateTime<Local> {
        Local
            .timestamp_millis_opt(self.now_millis())
            .earliest()
            .unwrap_or_else(|| DateTime::<Local>::from(UNIX_EPOCH))
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same underlying instant, so a clock handed to a component
/// can still be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    now_ms: Arc<AtomicI64>,
}

impl MockClock {
    /// Create a mock clock frozen at the current system time
    pub fn new() -> Self {
        Self::at(SystemClock.now_millis())
    }

    /// Create a mock clock frozen at `now_ms`
    pub fn at(now_ms: i64) -> Self {
        Self { now_ms: Arc::new(AtomicI64::new(now_ms)) }
    }

    /// Advance the clock by `delta_ms` milliseconds
    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute timestamp
    pub fn set_millis(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
