//! Live `HH:MM:SS` display for the running timer

use std::sync::Arc;
use std::time::Duration;

use lapse_common::time::{clock_label, recurring, Clock, TimerHandle};
use lapse_domain::constants::MAX_TICK_INTERVAL_MS;
use tracing::debug;

/// Periodically renders the elapsed time of a running timer
///
/// Each tick recomputes the label from `now - start`; nothing is
/// accumulated between ticks. Starting again or stopping cancels the
/// previous ticker, and so does dropping the display.
pub struct LiveTimerDisplay {
    clock: Arc<dyn Clock>,
    tick: Duration,
    handle: Option<TimerHandle>,
}

impl LiveTimerDisplay {
    /// Create a display ticking every `tick_interval_ms` (clamped to 1..=250)
    pub fn new(clock: Arc<dyn Clock>, tick_interval_ms: u64) -> Self {
        let tick = Duration::from_millis(tick_interval_ms.clamp(1, MAX_TICK_INTERVAL_MS));
        Self { clock, tick, handle: None }
    }

    /// Label for a timer started at `start_ms`, as of `now_ms`
    pub fn label_at(start_ms: i64, now_ms: i64) -> String {
        let elapsed = u64::try_from(now_ms.saturating_sub(start_ms)).unwrap_or_default();
        clock_label(elapsed / 1000)
    }

    /// Current label for a timer started at `start_ms`
    pub fn label(&self, start_ms: i64) -> String {
        Self::label_at(start_ms, self.clock.now_millis())
    }

    /// Render immediately, then on every tick until stopped
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, start_ms: i64, mut render: F)
    where
        F: FnMut(String) + Send + 'static,
    {
        self.stop();
        render(self.label(start_ms));

        let clock = Arc::clone(&self.clock);
        self.handle = Some(recurring(self.tick, move || {
            render(Self::label_at(start_ms, clock.now_millis()));
        }));
        debug!(start_ms, tick_ms = self.tick.as_millis() as u64, "live timer display started");
    }

    /// Cancel the ticker; no further renders happen
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    pub const fn tick(&self) -> Duration {
        self.tick
    }
}

impl Drop for LiveTimerDisplay {
    fn drop(&mut self) {
        self.stop();
    }
}
