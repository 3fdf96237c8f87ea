//! Idle/away detector
//!
//! Turns screen lock/unlock signals into away intervals. A lock records its
//! start instant and a caller-provided snapshot; the matching unlock either
//! reports a short absence or queues a [`PendingAway`] for the user to
//! resolve. Every transition is written immediately, and the lock is cleared
//! in the same write that queues its away interval.

use std::sync::Arc;

use lapse_common::time::Clock;
use lapse_domain::constants::IDLE_STORAGE_KEY;
use lapse_domain::{
    IdleRecord, IdleStatus, IdleTrackerState, LockPhase, PendingAway, ScreenState, ShortAway,
};
use tracing::{debug, info, warn};

use super::ports::LockHooks;
use crate::tracking::ports::{StateStore, WritePolicy};

/// What a signal did to the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum SignalOutcome {
    /// The screen locked and the lock start was recorded
    LockRecorded { lock_start: i64 },
    /// A lock signal arrived while already locked and was ignored
    AlreadyLocked,
    /// Unlocked before the away threshold; nothing was queued
    ShortAway(ShortAway),
    /// Unlocked after the away threshold; the interval awaits a decision
    AwayQueued(PendingAway),
    /// An unlock signal arrived without a recorded lock and was ignored
    NotLocked,
}

/// Lock/unlock state machine with a FIFO of unresolved away intervals
pub struct IdleDetector {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    away_threshold_ms: u64,
    state: IdleTrackerState,
}

impl IdleDetector {
    /// Load the idle record from `store`
    ///
    /// Unreadable records fall back to an unlocked tracker with no pending
    /// away intervals.
    pub fn load(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>, away_threshold_ms: u64) -> Self {
        let record = match store.load(IDLE_STORAGE_KEY) {
            Ok(Some(value)) => {
                let (record, dropped) = IdleRecord::from_value_lenient(&value);
                if dropped > 0 {
                    warn!(dropped, "discarded malformed away intervals");
                }
                record
            }
            Ok(None) => IdleRecord::default(),
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "failed to read idle state");
                IdleRecord::default()
            }
        };

        Self { store, clock, away_threshold_ms, state: IdleTrackerState::from(record) }
    }

    pub const fn state(&self) -> &IdleTrackerState {
        &self.state
    }

    pub fn status(&self) -> IdleStatus {
        self.state.status()
    }

    pub const fn away_threshold_ms(&self) -> u64 {
        self.away_threshold_ms
    }

    /// The away interval currently awaiting a decision
    pub fn pending(&self) -> Option<&PendingAway> {
        self.state.pending_head()
    }

    /// Number of unresolved away intervals, the presented one included
    pub fn pending_count(&self) -> usize {
        self.state.pending.len()
    }

    /// Apply a screen state change reported by the platform
    pub fn handle_signal(&mut self, signal: ScreenState, hooks: &dyn LockHooks) -> SignalOutcome {
        match signal {
            ScreenState::Locked => self.handle_locked(hooks),
            ScreenState::Unlocked => self.handle_unlocked(hooks),
        }
    }

    /// Close out a lock left over from a previous run
    ///
    /// A stored lock is treated as unlocked now, with the usual threshold
    /// rule. Returns `None` when no lock was stored.
    pub fn recover_on_startup(&mut self, hooks: &dyn LockHooks) -> Option<SignalOutcome> {
        let lock_start = self.state.lock_start()?;
        info!(lock_start, "recovering lock left over from a previous run");
        Some(self.handle_unlocked(hooks))
    }

    /// Remove the presented away interval after the user resolved it
    pub fn resolve_pending(&mut self) -> Option<PendingAway> {
        let resolved = self.state.pending.pop_front()?;
        debug!(
            lock_start = resolved.lock_start,
            remaining = self.state.pending.len(),
            "away interval resolved"
        );
        self.persist();
        Some(resolved)
    }

    fn handle_locked(&mut self, hooks: &dyn LockHooks) -> SignalOutcome {
        if let LockPhase::Locked { lock_start, .. } = &self.state.phase {
            debug!(lock_start, "lock signal while already locked, ignoring");
            return SignalOutcome::AlreadyLocked;
        }

        let lock_start = self.clock.now_millis();
        let meta = hooks.on_lock();
        info!(
            lock_start,
            project_id = meta.as_ref().and_then(|m| m.project_id.as_deref()),
            "screen locked"
        );
        self.state.phase = LockPhase::Locked { lock_start, meta };
        self.persist();
        SignalOutcome::LockRecorded { lock_start }
    }

    fn handle_unlocked(&mut self, hooks: &dyn LockHooks) -> SignalOutcome {
        let LockPhase::Locked { lock_start, meta } = std::mem::take(&mut self.state.phase) else {
            info!("screen unlocked without a recorded lock start, ignoring");
            return SignalOutcome::NotLocked;
        };

        let unlock_time = self.clock.now_millis();
        let duration_ms = u64::try_from(unlock_time.saturating_sub(lock_start)).unwrap_or_default();
        info!(lock_start, unlock_time, duration_ms, "screen unlocked");

        if duration_ms < self.away_threshold_ms {
            self.persist();
            debug!(duration_ms, threshold_ms = self.away_threshold_ms, "away below threshold");
            let away = ShortAway { unlock_time, duration_ms, meta };
            hooks.on_short_away(&away);
            return SignalOutcome::ShortAway(away);
        }

        let pending = PendingAway::new(lock_start, unlock_time, meta.as_ref());
        self.state.pending.push_back(pending.clone());
        if self.state.pending.len() > 1 {
            info!(queued = self.state.pending.len(), "away interval queued behind an unresolved one");
        }
        self.persist();
        SignalOutcome::AwayQueued(pending)
    }

    fn persist(&self) {
        let record = IdleRecord::from(&self.state);
        let payload = match serde_json::to_value(&record) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize idle state");
                return;
            }
        };
        if let Err(err) = self.store.save(IDLE_STORAGE_KEY, &payload, WritePolicy::Immediate) {
            warn!(error = %err, error_type = err.label(), "failed to persist idle state");
        }
    }
}
