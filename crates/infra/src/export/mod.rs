//! Export and import of the tracker record
//!
//! JSON export is the stored record pretty-printed; JSON import parses a file
//! leniently and hands the value to `SessionStore::replace_all`. CSV export
//! writes one row per session with every field quoted.

mod csv_rows;
mod json;

pub use csv_rows::{to_csv, to_csv_in, CSV_HEADER};
pub use json::{parse_import, read_import, to_json_pretty};
use lapse_domain::impl_wire_names;

/// Output formats supported by [`render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl_wire_names!(ExportFormat {
    Json => "json",
    Csv => "csv",
});

impl ExportFormat {
    /// File extension for exports in this format
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }
}

/// Render `record` in `format`
///
/// # Errors
/// Propagates serialization failures as `LapseError::Internal`.
pub fn render(
    record: &lapse_domain::TrackerRecord,
    format: ExportFormat,
) -> lapse_domain::Result<String> {
    match format {
        ExportFormat::Json => to_json_pretty(record),
        ExportFormat::Csv => to_csv(record),
    }
}
