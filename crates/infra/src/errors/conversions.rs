//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use csv::Error as CsvError;
use lapse_domain::LapseError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LapseError);

impl From<InfraError> for LapseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LapseError> for InfraError {
    fn from(value: LapseError) -> Self {
        InfraError(value)
    }
}

trait IntoLapseError {
    fn into_lapse(self) -> LapseError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → LapseError */
/* -------------------------------------------------------------------------- */

impl IntoLapseError for IoError {
    fn into_lapse(self) -> LapseError {
        match self.kind() {
            ErrorKind::NotFound => LapseError::NotFound(format!("file: {self}")),
            ErrorKind::PermissionDenied => {
                LapseError::Persistence(format!("permission denied: {self}"))
            }
            _ => LapseError::Persistence(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_lapse())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → LapseError */
/* -------------------------------------------------------------------------- */

impl IntoLapseError for JsonError {
    fn into_lapse(self) -> LapseError {
        if self.is_io() {
            return LapseError::Persistence(self.to_string());
        }
        LapseError::Validation(format!("Invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_lapse())
    }
}

/* -------------------------------------------------------------------------- */
/* csv::Error → LapseError */
/* -------------------------------------------------------------------------- */

impl IntoLapseError for CsvError {
    fn into_lapse(self) -> LapseError {
        LapseError::Internal(format!("CSV encoding failed: {self}"))
    }
}

impl From<CsvError> for InfraError {
    fn from(value: CsvError) -> Self {
        InfraError(value.into_lapse())
    }
}
