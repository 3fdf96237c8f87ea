//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Lapse
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LapseError {
    /// Bad interval or missing required field; the operation is aborted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stale id reference
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timer already running for project {0}")]
    AlreadyRunning(String),

    #[error("No active timer")]
    NotRunning,

    #[error("No project selected")]
    NoProjectSelected,

    /// Storage read/write failure; in-memory state stays authoritative
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LapseError {
    /// Stable label suitable for structured logging
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::AlreadyRunning(_) => "already_running",
            Self::NotRunning => "not_running",
            Self::NoProjectSelected => "no_project_selected",
            Self::Persistence(_) => "persistence",
            Self::Config(_) => "config",
            Self::Platform(_) => "platform",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the error should be shown to the user rather than only logged
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::AlreadyRunning(_) | Self::NotRunning | Self::NoProjectSelected
        )
    }
}

/// Result type alias for Lapse operations
pub type Result<T> = std::result::Result<T, LapseError>;
