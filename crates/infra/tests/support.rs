#![allow(dead_code)]

use std::sync::Arc;

use lapse_common::time::MockClock;
use lapse_core::{IdleDetector, SessionStore, StateStore};
use lapse_infra::JsonFileStore;
use tempfile::TempDir;

pub const T0: i64 = 1_715_601_600_000;

/// JSON file store in a temporary directory that lives as long as the value
pub struct TestDataDir {
    pub store: Arc<JsonFileStore>,
    pub clock: Arc<MockClock>,
    _dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let store = Arc::new(JsonFileStore::new(dir.path().join("state")));
        Self { store, clock: Arc::new(MockClock::at(T0)), _dir: dir }
    }

    pub fn path(&self, file: &str) -> std::path::PathBuf {
        self.store.dir().join(file)
    }

    pub fn state_store(&self) -> Arc<dyn StateStore> {
        self.store.clone()
    }

    /// Session store reading whatever is on disk right now
    pub fn session_store(&self) -> SessionStore {
        SessionStore::load(self.state_store(), self.clock.clone())
    }

    pub fn detector(&self) -> IdleDetector {
        IdleDetector::load(self.state_store(), self.clock.clone(), 60_000)
    }
}
