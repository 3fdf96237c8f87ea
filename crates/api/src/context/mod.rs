//! Application context - owner of every service
//!
//! `AppContext` is the single owner of the tracker and idle state. Commands
//! take `&mut AppContext` and reach the services through its fields; the
//! session store doubles as the detector's hooks and the dialog's
//! collaborator, handed over per call through disjoint field borrows.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lapse_common::time::{Clock, SystemClock};
use lapse_core::{
    DetectionMonitor, IdleDetector, LockSignalSource, ReconciliationDialog, SessionStore,
    SignalOutcome, StateStore,
};
use lapse_domain::{ActiveTimer, Config, Result};
use lapse_infra::{DebouncedStore, JsonFileStore, LineLockSource, MemoryStore, UnsupportedLockSource};
use tracing::{info, warn};

/// What [`AppContext::startup`] found from the previous run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupReport {
    pub resumed_timer: Option<ActiveTimer>,
    pub recovered_lock: Option<SignalOutcome>,
    pub pending_away: usize,
}

/// How this process relates to lock detection
///
/// Only the process that receives lock events may decide that a stored lock
/// was abandoned. Short commands run while a watcher holds the lock and must
/// leave it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessRole {
    /// One-shot command; a stored lock belongs to whoever recorded it
    #[default]
    Command,
    /// Owns detection; a stored lock was left by a run that never saw the unlock
    Watcher,
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub sessions: SessionStore,
    pub detector: IdleDetector,
    pub dialog: ReconciliationDialog,
    pub monitor: DetectionMonitor,
    storage: Arc<DebouncedStore<dyn StateStore>>,
}

impl AppContext {
    /// Context backed by JSON files under `config.storage.data_dir`
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns `LapseError::Config` if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let backing: Arc<dyn StateStore> =
            Arc::new(JsonFileStore::new(Path::new(&config.storage.data_dir)));
        let source: Arc<dyn LockSignalSource> = if config.idle.enabled {
            Arc::new(LineLockSource::stdin())
        } else {
            Arc::new(UnsupportedLockSource)
        };
        Ok(Self::with_parts(config, backing, Arc::new(SystemClock), source))
    }

    /// Context whose state lives only as long as the process
    ///
    /// # Errors
    /// Returns `LapseError::Config` if the configuration is invalid.
    pub fn ephemeral(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
            Arc::new(UnsupportedLockSource),
        ))
    }

    /// Assemble a context from explicit parts
    ///
    /// Loads both records from `backing`; call [`startup`](Self::startup)
    /// before dispatching commands.
    pub fn with_parts(
        config: Config,
        backing: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        source: Arc<dyn LockSignalSource>,
    ) -> Self {
        let storage: Arc<DebouncedStore<dyn StateStore>> = Arc::new(DebouncedStore::new(
            backing,
            Duration::from_millis(config.storage.debounce_ms),
        ));
        let store: Arc<dyn StateStore> = storage.clone();

        let sessions = SessionStore::load(Arc::clone(&store), Arc::clone(&clock));
        let detector = IdleDetector::load(store, Arc::clone(&clock), config.idle.away_threshold_ms);
        let monitor = DetectionMonitor::new(source, config.idle.threshold_ms);

        Self {
            config,
            clock,
            sessions,
            detector,
            dialog: ReconciliationDialog::new(),
            monitor,
            storage,
        }
    }

    /// Resume the running timer and open any queued away interval
    ///
    /// A [`ProcessRole::Watcher`] also recovers a lock left by a previous
    /// run; commands keep a stored lock so the process that recorded it, or
    /// an explicit unlock signal, can close it.
    pub fn startup(&mut self, role: ProcessRole) -> StartupReport {
        let resumed_timer = self.sessions.resume_timer().cloned();
        let recovered_lock = match role {
            ProcessRole::Watcher => self.detector.recover_on_startup(&self.sessions),
            ProcessRole::Command => None,
        };
        self.dialog.open(&self.detector);

        let report = StartupReport {
            resumed_timer,
            recovered_lock,
            pending_away: self.detector.pending_count(),
        };
        info!(
            ?role,
            timer_running = report.resumed_timer.is_some(),
            recovered_lock = report.recovered_lock.is_some(),
            pending_away = report.pending_away,
            "application state restored"
        );
        report
    }

    /// Re-read both records from storage
    ///
    /// Used by long-running processes so changes made by one-shot commands
    /// against the same data directory are picked up. An outstanding note
    /// prompt is dropped; the dialog is reopened on the current queue head.
    pub fn reload(&mut self) {
        if let Err(err) = self.storage.flush() {
            warn!(error = %err, "failed to flush state before reload");
        }
        let store: Arc<dyn StateStore> = self.storage.clone();
        self.sessions = SessionStore::load(Arc::clone(&store), Arc::clone(&self.clock));
        self.detector =
            IdleDetector::load(store, Arc::clone(&self.clock), self.config.idle.away_threshold_ms);
        self.dialog.open(&self.detector);
    }

    /// Write pending debounced state now
    ///
    /// # Errors
    /// Returns the first storage error; every pending key is attempted.
    pub fn flush(&self) -> Result<()> {
        self.storage.flush()
    }

    /// Stop detection and the debounce worker, flushing pending writes
    ///
    /// # Errors
    /// See [`flush`](Self::flush).
    pub async fn shutdown(&mut self) -> Result<()> {
        self.monitor.stop();
        let result = self.storage.shutdown().await;
        if let Err(err) = &result {
            warn!(error = %err, "failed to flush state on shutdown");
        }
        result
    }
}
