use chrono::{Local, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use lapse_common::time::format_timestamp_in;
use lapse_domain::constants::UNKNOWN_PROJECT_LABEL;
use lapse_domain::{LapseError, Result, TrackerRecord};

use crate::errors::InfraError;

pub const CSV_HEADER: [&str; 6] = ["Project", "Start", "End", "Seconds", "Note", "Source"];

/// One row per session, timestamps in the local timezone
pub fn to_csv(record: &TrackerRecord) -> Result<String> {
    to_csv_in(record, &Local)
}

/// One row per session, timestamps rendered in `tz`
///
/// Every field is quoted and embedded quotes are doubled. Sessions whose
/// project no longer exists are labelled `Unknown Project`.
///
/// # Errors
/// Returns `LapseError::Internal` if the writer fails.
pub fn to_csv_in<Tz>(record: &TrackerRecord, tz: &Tz) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(InfraError::from)?;
    for session in &record.sessions {
        let project = record
            .projects
            .iter()
            .find(|p| p.id == session.project_id)
            .map_or(UNKNOWN_PROJECT_LABEL, |p| p.name.as_str());

        let start = format_timestamp_in(session.start, tz);
        let end = format_timestamp_in(session.end, tz);
        let seconds = session.seconds.to_string();
        writer
            .write_record([
                project,
                start.as_str(),
                end.as_str(),
                seconds.as_str(),
                session.note.as_str(),
                session.source.as_str(),
            ])
            .map_err(InfraError::from)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LapseError::Internal(format!("CSV buffer: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| LapseError::Internal(format!("CSV is not UTF-8: {e}")))
}
