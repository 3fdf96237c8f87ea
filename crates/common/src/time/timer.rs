//! Recurring timers with cancellation support
//!
//! Used for polling-style work such as refreshing the live timer display. The
//! callback never receives an accumulated elapsed value: callers recompute
//! whatever they display from absolute timestamps on every tick.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A handle that cancels a running timer
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::cancel`].
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    fn new() -> Self {
        Self { token: CancellationToken::new() }
    }

    /// Cancel the timer; the callback will not fire again
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if the timer has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Create a recurring timer that invokes `callback` every `period`
///
/// Missed ticks are skipped rather than bursted. Must be called from within a
/// tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use lapse_common::time::timer::recurring;
///
/// #[tokio::main]
/// async fn main() {
///     let handle = recurring(Duration::from_millis(200), || {
///         println!("tick");
///     });
///
///     tokio::time::sleep(Duration::from_secs(1)).await;
///     handle.cancel();
/// }
/// ```
pub fn recurring<F>(period: Duration, mut callback: F) -> TimerHandle
where
    F: FnMut() + Send + 'static,
{
    let handle = TimerHandle::new();
    let token = handle.token.clone();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await; // Skip first immediate tick

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                _ = interval.tick() => callback(),
            }
        }
        debug!(period_ms = period.as_millis() as u64, "recurring timer stopped");
    });

    handle
}
