//! Human-readable duration and timestamp formatting

use chrono::{Local, TimeZone};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a number of seconds as `"<h>h <m>m <s>s"`
///
/// Hours appear only when non-zero, minutes when either minutes or hours are
/// non-zero, and seconds always.
///
/// # Examples
///
/// ```
/// use lapse_common::time::format::duration_label;
///
/// assert_eq!(duration_label(45), "45s");
/// assert_eq!(duration_label(600), "10m 0s");
/// assert_eq!(duration_label(3661), "1h 1m 1s");
/// ```
pub fn duration_label(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut pieces = Vec::with_capacity(3);
    if hours > 0 {
        pieces.push(format!("{hours}h"));
    }
    if minutes > 0 || hours > 0 {
        pieces.push(format!("{minutes}m"));
    }
    pieces.push(format!("{seconds}s"));

    pieces.join(" ")
}

/// Format a millisecond duration, rounded to the nearest second
///
/// Negative durations are clamped to zero.
///
/// # Examples
///
/// ```
/// use lapse_common::time::format::duration_label_ms;
///
/// assert_eq!(duration_label_ms(120_000), "2m 0s");
/// assert_eq!(duration_label_ms(1_499), "1s");
/// assert_eq!(duration_label_ms(-5), "0s");
/// ```
pub fn duration_label_ms(duration_ms: i64) -> String {
    duration_label(round_millis_to_seconds(duration_ms))
}

/// Round milliseconds to whole seconds, half away from zero, clamped at zero
pub fn round_millis_to_seconds(duration_ms: i64) -> u64 {
    let clamped = u64::try_from(duration_ms.max(0)).unwrap_or_default();
    (clamped + 500) / 1000
}

/// Format seconds as a `HH:MM:SS` stopwatch label
///
/// Hours are not wrapped at 24 so long-running timers stay readable.
///
/// # Examples
///
/// ```
/// use lapse_common::time::format::clock_label;
///
/// assert_eq!(clock_label(0), "00:00:00");
/// assert_eq!(clock_label(3_725), "01:02:05");
/// ```
pub fn clock_label(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format an epoch-millisecond timestamp in the local timezone
///
/// Returns an empty string for timestamps chrono cannot represent.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    format_timestamp_in(timestamp_ms, &Local)
}

/// Format an epoch-millisecond timestamp in an explicit timezone
pub fn format_timestamp_in<Tz>(timestamp_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(timestamp_ms).earliest() {
        Some(moment) => moment.format(TIMESTAMP_FORMAT).to_string(),
        None => String::new(),
    }
}
