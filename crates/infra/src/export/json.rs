use std::path::Path;

use lapse_domain::{LapseError, Result, TrackerRecord};
use serde_json::Value;

use crate::errors::InfraError;

/// Pretty-printed JSON of the whole record, as stored
pub fn to_json_pretty(record: &TrackerRecord) -> Result<String> {
    serde_json::to_string_pretty(record)
        .map_err(|e| LapseError::Internal(format!("failed to serialize tracker record: {e}")))
}

/// Parse import text into a raw value
///
/// Only the syntax is checked here; field-level problems are handled by the
/// lenient record loader.
///
/// # Errors
/// Returns `LapseError::Validation("Invalid JSON: ...")` for unparsable text.
pub fn parse_import(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| InfraError::from(e).into())
}

/// Read and parse an import file
///
/// # Errors
/// Returns `LapseError::NotFound` for a missing file and the errors of
/// [`parse_import`] otherwise.
pub fn read_import(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(InfraError::from)?;
    parse_import(&text)
}
