//! Idle/away tracking types
//!
//! The persisted [`IdleRecord`] keeps the established storage layout
//! (`lockStart`, `lockMeta`, `pendingAway`) plus a `queuedAway` backlog. In
//! memory the same data is held as an [`IdleTrackerState`], whose
//! [`LockPhase`] makes "locked without a start time" unrepresentable.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_wire_names;
use crate::types::session::session_seconds;
use crate::utils::lenient::{elements, or_default, timestamp};

/// Screen state reported by the platform signal source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenState {
    Locked,
    Unlocked,
}

impl_wire_names!(ScreenState {
    Locked => "locked",
    Unlocked => "unlocked",
});

/// Permission/capability state of the platform lock detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Unsupported,
    #[default]
    Prompt,
    Denied,
    Granted,
    Error,
}

impl_wire_names!(PermissionState {
    Unsupported => "unsupported",
    Prompt => "prompt",
    Denied => "denied",
    Granted => "granted",
    Error => "error",
});

impl PermissionState {
    /// Non-blocking notice for the user; `None` once detection is granted
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Granted => None,
            Self::Unsupported => Some("Idle detection is not supported on this platform."),
            Self::Denied => Some(
                "Idle detection is disabled. Enable it to account for time away while the screen is locked.",
            ),
            Self::Prompt => {
                Some("Idle detection permission is needed to notice when your screen locks.")
            }
            Self::Error => Some("Idle detection is currently unavailable."),
        }
    }

    /// Whether asking the user again could change the outcome
    pub const fn can_request(&self) -> bool {
        !matches!(self, Self::Unsupported | Self::Granted)
    }
}

/// Caller-supplied snapshot taken when the screen locks
///
/// Only `projectId` is interpreted; every other key is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockMeta {
    #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LockMeta {
    /// Snapshot naming the project active at lock time
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self { project_id: Some(project_id.into()), extra: Map::new() }
    }
}

/// A detected away interval awaiting a user decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAway {
    #[serde(deserialize_with = "timestamp")]
    pub lock_start: i64,
    #[serde(deserialize_with = "timestamp")]
    pub unlock_time: i64,
    #[serde(default, deserialize_with = "or_default")]
    pub duration_ms: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub project_suggestion: Option<String>,
}

impl PendingAway {
    /// Build the away interval for a lock at `lock_start` ending at `unlock_time`
    pub fn new(lock_start: i64, unlock_time: i64, meta: Option<&LockMeta>) -> Self {
        Self {
            lock_start,
            unlock_time,
            duration_ms: u64::try_from(unlock_time.saturating_sub(lock_start)).unwrap_or_default(),
            project_suggestion: meta.and_then(|m| m.project_id.clone()).filter(|id| !id.is_empty()),
        }
    }

    /// Seconds a session covering this interval would record
    pub fn session_seconds(&self) -> u64 {
        session_seconds(self.lock_start, self.unlock_time)
    }

    /// Restore `durationMs == unlockTime - lockStart` on a stored record
    ///
    /// Returns `None` when the stored interval runs backwards.
    pub fn normalized(self) -> Option<Self> {
        if self.unlock_time < self.lock_start {
            return None;
        }
        let meta = self.project_suggestion.map(LockMeta::for_project);
        Some(Self::new(self.lock_start, self.unlock_time, meta.as_ref()))
    }
}

/// Notification payload for sub-threshold away intervals
#[derive(Debug, Clone, PartialEq)]
pub struct ShortAway {
    pub unlock_time: i64,
    pub duration_ms: u64,
    pub meta: Option<LockMeta>,
}

/// Lock phase of the idle tracker
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LockPhase {
    #[default]
    Unlocked,
    Locked { lock_start: i64, meta: Option<LockMeta> },
}

/// Externally visible tracker status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdleStatus {
    Unlocked,
    Locked,
    AwayPending,
}

impl_wire_names!(IdleStatus {
    Unlocked => "unlocked",
    Locked => "locked",
    AwayPending => "away-pending",
});

/// In-memory idle tracker state
///
/// `pending` is a FIFO: a second away interval detected while one is still
/// awaiting a decision is queued behind it, never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdleTrackerState {
    pub phase: LockPhase,
    pub pending: VecDeque<PendingAway>,
}

impl IdleTrackerState {
    /// Status derived from phase and backlog; a held lock takes precedence
    pub fn status(&self) -> IdleStatus {
        match (&self.phase, self.pending.is_empty()) {
            (LockPhase::Locked { .. }, _) => IdleStatus::Locked,
            (LockPhase::Unlocked, false) => IdleStatus::AwayPending,
            (LockPhase::Unlocked, true) => IdleStatus::Unlocked,
        }
    }

    /// Away interval currently presented to the user
    pub fn pending_head(&self) -> Option<&PendingAway> {
        self.pending.front()
    }

    /// Lock start, if the screen is currently locked
    pub const fn lock_start(&self) -> Option<i64> {
        match &self.phase {
            LockPhase::Locked { lock_start, .. } => Some(*lock_start),
            LockPhase::Unlocked => None,
        }
    }
}

/// Persisted idle record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleRecord {
    pub lock_start: Option<i64>,
    pub lock_meta: Option<LockMeta>,
    pub pending_away: Option<PendingAway>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queued_away: Vec<PendingAway>,
}

impl IdleRecord {
    /// Read a stored record, substituting defaults field by field
    ///
    /// Returns the record and the number of away intervals that were
    /// unreadable and dropped.
    pub fn from_value_lenient(value: &Value) -> (Self, usize) {
        let lock_start = value.get("lockStart").and_then(|v| {
            v.as_i64().or_else(|| v.as_f64().filter(|f| f.is_finite()).map(truncate_millis))
        });
        let lock_meta = value
            .get("lockMeta")
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value::<LockMeta>(v.clone()).ok());

        let mut dropped = 0;
        let pending_away = match value.get("pendingAway") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let parsed = serde_json::from_value::<PendingAway>(raw.clone())
                    .ok()
                    .and_then(PendingAway::normalized);
                if parsed.is_none() {
                    dropped += 1;
                }
                parsed
            }
        };

        let (queued, unreadable) = elements::<PendingAway>(value.get("queuedAway"));
        dropped += unreadable;
        let queued_len = queued.len();
        let queued_away: Vec<PendingAway> =
            queued.into_iter().filter_map(PendingAway::normalized).collect();
        dropped += queued_len - queued_away.len();

        (Self { lock_start, lock_meta, pending_away, queued_away }, dropped)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_millis(value: f64) -> i64 {
    value.trunc() as i64
}

impl From<&IdleTrackerState> for IdleRecord {
    fn from(state: &IdleTrackerState) -> Self {
        let (lock_start, lock_meta) = match &state.phase {
            LockPhase::Locked { lock_start, meta } => (Some(*lock_start), meta.clone()),
            LockPhase::Unlocked => (None, None),
        };
        let mut pending = state.pending.iter().cloned();
        Self { lock_start, lock_meta, pending_away: pending.next(), queued_away: pending.collect() }
    }
}

impl From<IdleRecord> for IdleTrackerState {
    fn from(record: IdleRecord) -> Self {
        let phase = match record.lock_start {
            Some(lock_start) => LockPhase::Locked { lock_start, meta: record.lock_meta },
            None => LockPhase::Unlocked,
        };
        let pending = record.pending_away.into_iter().chain(record.queued_away).collect();
        Self { phase, pending }
    }
}
