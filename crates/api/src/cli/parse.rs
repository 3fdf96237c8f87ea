//! Value parsers for command-line arguments

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp argument into epoch milliseconds
///
/// Accepts RFC 3339 (`2024-05-13T09:00:00Z`), local wall-clock time
/// (`2024-05-13 09:00`) or a bare epoch-millisecond integer.
///
/// # Errors
/// Returns a message naming the accepted forms when nothing matches, or
/// when a local time does not exist (skipped by a DST change).
pub fn parse_timestamp(raw: &str) -> Result<i64, String> {
    parse_timestamp_in(raw, &Local)
}

/// [`parse_timestamp`] with wall-clock times read in `tz`
pub fn parse_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<i64, String> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<i64>().map_err(|e| format!("invalid epoch milliseconds: {e}"));
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(raw) {
        return Ok(moment.timestamp_millis());
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| {
            format!("invalid timestamp \"{raw}\": use RFC 3339, YYYY-MM-DD HH:MM or epoch milliseconds")
        })?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|moment| moment.timestamp_millis())
        .ok_or_else(|| format!("{raw} does not exist in the local timezone"))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    const T0: i64 = 1_715_590_800_000; // 2024-05-13T09:00:00Z

    #[test]
    fn accepts_rfc3339_with_offset() {
        assert_eq!(parse_timestamp_in("2024-05-13T09:00:00Z", &Utc), Ok(T0));
        assert_eq!(parse_timestamp_in("2024-05-13T11:00:00+02:00", &Utc), Ok(T0));
    }

    #[test]
    fn reads_wall_clock_in_given_zone() {
        let cest = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        assert_eq!(parse_timestamp_in("2024-05-13 11:00", &cest), Ok(T0));
        assert_eq!(parse_timestamp_in("2024-05-13 09:00:30", &Utc), Ok(T0 + 30_000));
    }

    #[test]
    fn accepts_epoch_millis() {
        assert_eq!(parse_timestamp_in(" 1715590800000 ", &Utc), Ok(T0));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp_in("yesterday", &Utc).expect_err("not a timestamp");
        assert!(err.contains("yesterday"));
        assert!(parse_timestamp_in("", &Utc).is_err());
    }
}
