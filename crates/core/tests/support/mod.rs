//! Shared test helpers for `lapse-core` integration tests.
//!
//! These helpers provide in-memory ports and a wired-up fixture so that
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod lock_source;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lapse_common::time::MockClock;
use lapse_core::{IdleDetector, LockHooks, SessionStore, StateStore, WritePolicy};
use lapse_domain::{LapseError, LockMeta, Project, ProjectDraft, Result as DomainResult, ShortAway};
use parking_lot::Mutex;
use serde_json::Value;

/// Arbitrary fixed "now" used by fixtures (2024-05-13T12:00:00Z).
pub const T0: i64 = 1_715_601_600_000;

/// Away threshold used by fixtures.
pub const AWAY_THRESHOLD_MS: u64 = 60_000;

/// In-memory `StateStore` that records every write and its policy.
#[derive(Default)]
pub struct MemoryStateStore {
    records: Mutex<HashMap<String, Value>>,
    writes: Mutex<Vec<(String, WritePolicy)>>,
    fail_saves: AtomicBool,
}

impl MemoryStateStore {
    /// Create a store pre-populated with `key -> value`.
    pub fn seeded(key: &str, value: Value) -> Self {
        let store = Self::default();
        store.records.lock().insert(key.to_string(), value);
        store
    }

    /// Current value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.records.lock().get(key).cloned()
    }

    /// Policies of every write to `key`, in order.
    pub fn policies(&self, key: &str) -> Vec<WritePolicy> {
        self.writes.lock().iter().filter(|(k, _)| k == key).map(|(_, p)| *p).collect()
    }

    /// Make every subsequent save fail.
    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> DomainResult<Option<Value>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, payload: &Value, policy: WritePolicy) -> DomainResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LapseError::Persistence("disk full".into()));
        }
        self.records.lock().insert(key.to_string(), payload.clone());
        self.writes.lock().push((key.to_string(), policy));
        Ok(())
    }
}

/// `LockHooks` that returns a fixed snapshot and records short absences.
#[derive(Default)]
pub struct RecordingHooks {
    pub meta: Option<LockMeta>,
    pub short_aways: Mutex<Vec<ShortAway>>,
    pub locks: Mutex<usize>,
}

impl RecordingHooks {
    /// Hooks whose lock snapshot suggests `project_id`.
    pub fn suggesting(project_id: &str) -> Self {
        Self { meta: Some(LockMeta::for_project(project_id)), ..Self::default() }
    }

    pub fn short_away_count(&self) -> usize {
        self.short_aways.lock().len()
    }
}

impl LockHooks for RecordingHooks {
    fn on_lock(&self) -> Option<LockMeta> {
        *self.locks.lock() += 1;
        self.meta.clone()
    }

    fn on_short_away(&self, away: &ShortAway) {
        self.short_aways.lock().push(away.clone());
    }
}

/// Wired-up store, detector and mock clock sharing one backend.
pub struct TestContext {
    pub clock: MockClock,
    pub backend: Arc<MemoryStateStore>,
    pub store: SessionStore,
    pub detector: IdleDetector,
}

impl TestContext {
    /// Reload store and detector from the backend, as a restart would.
    pub fn restart(self) -> Self {
        create_test_context_with(self.backend, self.clock)
    }

    /// Add an active project named `name`.
    pub fn project(&mut self, name: &str) -> Project {
        self.store.add_project(ProjectDraft::named(name, "")).expect("failed to add project")
    }
}

/// Create a test context over an empty backend with the clock at [`T0`].
pub fn create_test_context() -> TestContext {
    create_test_context_with(Arc::new(MemoryStateStore::default()), MockClock::at(T0))
}

/// Create a test context over an existing backend and clock.
pub fn create_test_context_with(backend: Arc<MemoryStateStore>, clock: MockClock) -> TestContext {
    let store = SessionStore::load(backend.clone(), Arc::new(clock.clone()));
    let detector = IdleDetector::load(backend.clone(), Arc::new(clock.clone()), AWAY_THRESHOLD_MS);
    TestContext { clock, backend, store, detector }
}
