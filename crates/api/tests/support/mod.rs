//! Shared test helpers for `lapse-app` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use lapse_common::time::MockClock;
use lapse_domain::{Config, Project, ProjectDraft, ScreenState};
use lapse_infra::{MemoryStore, UnsupportedLockSource};
use lapse_lib::{commands, AppContext};

/// Fixed "now" for fixtures (2024-05-13T12:00:00Z).
pub const T0: i64 = 1_715_601_600_000;

/// Application context over an in-memory store and a mock clock.
pub struct TestApp {
    pub ctx: AppContext,
    pub backend: Arc<MemoryStore>,
    pub clock: Arc<MockClock>,
}

impl TestApp {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self::over(Arc::new(MemoryStore::new()), Arc::new(MockClock::at(T0)))
    }

    /// Context reading whatever `backend` already holds.
    pub fn over(backend: Arc<MemoryStore>, clock: Arc<MockClock>) -> Self {
        let ctx = AppContext::with_parts(
            Config::default(),
            backend.clone(),
            clock.clone(),
            Arc::new(UnsupportedLockSource),
        );
        Self { ctx, backend, clock }
    }

    pub fn project(&mut self, name: &str) -> Project {
        commands::add_project(&mut self.ctx, ProjectDraft::named(name, "")).expect("add project")
    }

    /// Lock, wait `away_ms`, unlock.
    pub fn step_away(&mut self, away_ms: i64) {
        commands::apply_signal(&mut self.ctx, ScreenState::Locked);
        self.clock.advance_ms(away_ms);
        commands::apply_signal(&mut self.ctx, ScreenState::Unlocked);
    }
}
