//! Port interfaces for state persistence
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use lapse_domain::Result;
use serde_json::Value;

/// How urgently a write must reach durable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritePolicy {
    /// Written before `save` returns
    Immediate,
    /// Coalesced with other writes for the same key after a quiet period
    Debounced,
}

/// Key/value store for whole JSON records
///
/// Implementations must not block the caller for debounced writes. An
/// immediate write supersedes any pending debounced write for the same key.
pub trait StateStore: Send + Sync {
    /// Read the record stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Store `payload` under `key`
    fn save(&self, key: &str, payload: &Value, policy: WritePolicy) -> Result<()>;
}
