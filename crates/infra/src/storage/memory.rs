//! In-memory state store

use std::collections::HashMap;

use lapse_core::{StateStore, WritePolicy};
use lapse_domain::Result;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

/// One write as seen by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub key: String,
    pub policy: WritePolicy,
}

/// Process-local store that keeps a log of every write
///
/// Used for `--ephemeral` runs and as the backing store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    writes: Mutex<Vec<WriteRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `value` under `key`; the seed is not logged
    /// as a write
    pub fn with_value(key: &str, value: Value) -> Self {
        let store = Self::new();
        store.values.write().insert(key.to_string(), value);
        store
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().clone()
    }

    /// Number of writes that reached this store for `key`
    pub fn write_count(&self, key: &str) -> usize {
        self.writes.lock().iter().filter(|w| w.key == key).count()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, payload: &Value, policy: WritePolicy) -> Result<()> {
        self.values.write().insert(key.to_string(), payload.clone());
        self.writes.lock().push(WriteRecord { key: key.to_string(), policy });
        Ok(())
    }
}
