//! Active timer type

use serde::{Deserialize, Serialize};

use crate::utils::lenient::timestamp;

/// The single in-progress, not-yet-completed tracked interval
///
/// Only the start instant is stored. Elapsed time is always derived from
/// `now - start`, which keeps a resumed timer exact after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    pub project_id: String,
    #[serde(deserialize_with = "timestamp")]
    pub start: i64,
}

impl ActiveTimer {
    pub fn new(project_id: impl Into<String>, start: i64) -> Self {
        Self { project_id: project_id.into(), start }
    }

    /// Milliseconds elapsed at `now_ms`, never negative
    pub const fn elapsed_ms(&self, now_ms: i64) -> i64 {
        let elapsed = now_ms.saturating_sub(self.start);
        if elapsed < 0 {
            0
        } else {
            elapsed
        }
    }

    /// Whole seconds elapsed at `now_ms`
    pub fn elapsed_seconds(&self, now_ms: i64) -> u64 {
        u64::try_from(self.elapsed_ms(now_ms) / 1000).unwrap_or_default()
    }
}
