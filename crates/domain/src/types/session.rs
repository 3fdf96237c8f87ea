//! Work session types

use serde::{Deserialize, Serialize};

use crate::errors::{LapseError, Result};
use crate::impl_wire_names;
use crate::utils::lenient::{or_default, timestamp};

/// How a session came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionSource {
    #[default]
    Manual,
    Timer,
    IdleDetection,
}

impl_wire_names!(SessionSource {
    Manual => "manual",
    Timer => "timer",
    IdleDetection => "idle-detection",
});

/// A completed, bounded interval of tracked work
///
/// Invariant: `end > start` and `seconds == max(1, round((end - start) / 1000))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub project_id: String,
    #[serde(deserialize_with = "timestamp")]
    pub start: i64,
    #[serde(deserialize_with = "timestamp")]
    pub end: i64,
    #[serde(default, deserialize_with = "or_default")]
    pub seconds: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub note: String,
    #[serde(default, deserialize_with = "or_default")]
    pub source: SessionSource,
}

impl Session {
    /// Validate a draft and materialize it as a session
    ///
    /// # Errors
    /// Returns `LapseError::Validation` if the project id is empty or the
    /// interval is not strictly positive.
    pub fn from_draft(id: impl Into<String>, draft: SessionDraft) -> Result<Self> {
        let project_id = draft.project_id.trim().to_string();
        if project_id.is_empty() {
            return Err(LapseError::Validation("Select a project for this session.".into()));
        }
        validate_interval(draft.start, draft.end)?;

        Ok(Self {
            id: id.into(),
            project_id,
            start: draft.start,
            end: draft.end,
            seconds: session_seconds(draft.start, draft.end),
            note: draft.note.trim().to_string(),
            source: draft.source,
        })
    }

    /// Return a copy with `patch` applied and `seconds` re-derived
    ///
    /// # Errors
    /// Returns `LapseError::Validation` if the patched interval is invalid or
    /// the patched project id is empty. `self` is never modified.
    pub fn patched(&self, patch: &SessionPatch) -> Result<Self> {
        let project_id = match &patch.project_id {
            Some(id) if id.trim().is_empty() => {
                return Err(LapseError::Validation("Select a project for this session.".into()))
            }
            Some(id) => id.trim().to_string(),
            None => self.project_id.clone(),
        };
        let start = patch.start.unwrap_or(self.start);
        let end = patch.end.unwrap_or(self.end);
        validate_interval(start, end)?;

        Ok(Self {
            id: self.id.clone(),
            project_id,
            start,
            end,
            seconds: session_seconds(start, end),
            note: patch.note.as_deref().map_or_else(|| self.note.clone(), |n| n.trim().to_string()),
            source: self.source,
        })
    }

    /// Interval length in milliseconds
    pub const fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Restore the seconds invariant on a record read from storage
    ///
    /// Returns `None` when the stored interval is unusable.
    pub fn normalized(mut self) -> Option<Self> {
        if self.end <= self.start || self.project_id.trim().is_empty() {
            return None;
        }
        if self.seconds == 0 {
            self.seconds = session_seconds(self.start, self.end);
        }
        Some(self)
    }
}

/// Fields required to create a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub project_id: String,
    pub start: i64,
    pub end: i64,
    pub note: String,
    pub source: SessionSource,
}

/// Partial update for a stored session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub project_id: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub note: Option<String>,
}

impl SessionPatch {
    /// Patch that only replaces the note
    pub fn note(note: impl Into<String>) -> Self {
        Self { note: Some(note.into()), ..Self::default() }
    }
}

/// `max(1, round((end - start) / 1000))`, rounding half up
pub fn session_seconds(start: i64, end: i64) -> u64 {
    let diff = u64::try_from(end.saturating_sub(start)).unwrap_or_default();
    ((diff + 500) / 1000).max(1)
}

/// Reject intervals whose end is not strictly after their start
///
/// # Errors
/// Returns `LapseError::Validation` when `end <= start`.
pub fn validate_interval(start: i64, end: i64) -> Result<()> {
    if end <= start {
        return Err(LapseError::Validation("End time must be after the start time.".into()));
    }
    Ok(())
}
