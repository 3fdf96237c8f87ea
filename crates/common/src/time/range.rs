//! Half-open reporting ranges aligned to local midnight

use chrono::{Datelike, Days, Local, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone};

/// Upper bound of the all-time range, 275760-09-13 UTC
pub const DISTANT_FUTURE_MS: i64 = 8_640_000_000_000_000;

/// Half-open interval `[start_ms, end_ms)` in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    /// Create a range from explicit bounds
    pub const fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Whether `timestamp_ms` lies inside `[start_ms, end_ms)`
    pub const fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms < self.end_ms
    }

    /// Length of the range in milliseconds
    pub const fn span_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Local-midnight aligned bounds of the day containing `date`
pub fn day_bounds(date: NaiveDate) -> TimeRange {
    day_bounds_in(date, &Local)
}

/// Day bounds in an explicit timezone
pub fn day_bounds_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> TimeRange {
    let start_ms = midnight_millis(date, tz);
    let end_ms = date.succ_opt().map_or(DISTANT_FUTURE_MS, |next| midnight_millis(next, tz));
    TimeRange::new(start_ms, end_ms)
}

/// Bounds of the Monday-started week containing `date`
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, Utc};
/// use lapse_common::time::range::{day_bounds_in, week_bounds_in};
///
/// // 2024-05-15 is a Wednesday; its week starts on Monday 2024-05-13.
/// let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
/// let monday = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
/// let week = week_bounds_in(wednesday, &Utc);
/// assert_eq!(week.start_ms, day_bounds_in(monday, &Utc).start_ms);
/// assert_eq!(week.span_ms(), 7 * 86_400_000);
/// ```
pub fn week_bounds(date: NaiveDate) -> TimeRange {
    week_bounds_in(date, &Local)
}

/// Week bounds in an explicit timezone
pub fn week_bounds_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> TimeRange {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
    let start_ms = midnight_millis(monday, tz);
    let end_ms = monday
        .checked_add_days(Days::new(7))
        .map_or(DISTANT_FUTURE_MS, |next| midnight_millis(next, tz));
    TimeRange::new(start_ms, end_ms)
}

/// Sentinel range including every real timestamp
pub const fn all_time_bounds() -> TimeRange {
    TimeRange::new(0, DISTANT_FUTURE_MS)
}

/// Epoch milliseconds of local midnight on `date`
///
/// Zones that skip midnight for a DST change start the day at the first
/// valid local instant instead.
fn midnight_millis<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(moment) | LocalResult::Ambiguous(moment, _) => moment.timestamp_millis(),
        LocalResult::None => tz
            .from_local_datetime(&(midnight + TimeDelta::hours(1)))
            .earliest()
            .map_or_else(|| midnight.and_utc().timestamp_millis(), |moment| moment.timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::range.
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// Validates `day_bounds_in` for a UTC day.
    ///
    /// Assertions:
    /// - Start is midnight, end is the following midnight.
    /// - The range is half-open.
    #[test]
    fn test_day_bounds_utc() {
        let range = day_bounds_in(date(1970, 1, 2), &Utc);
        assert_eq!(range.start_ms, 86_400_000);
        assert_eq!(range.end_ms, 2 * 86_400_000);
        assert!(range.contains(86_400_000));
        assert!(!range.contains(2 * 86_400_000));
    }

    #[test]
    fn test_day_bounds_respects_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let range = day_bounds_in(date(1970, 1, 2), &plus_two);
        assert_eq!(range.start_ms, 86_400_000 - 2 * 3_600_000);
        assert_eq!(range.span_ms(), 86_400_000);
    }

    /// Validates `week_bounds_in` for every weekday of one week.
    ///
    /// Assertions:
    /// - Monday through Sunday all map to the same Monday start.
    #[test]
    fn test_week_bounds_start_monday() {
        let monday = day_bounds_in(date(2024, 5, 13), &Utc).start_ms;
        for day in 13..=19 {
            let week = week_bounds_in(date(2024, 5, day), &Utc);
            assert_eq!(week.start_ms, monday, "day {day}");
            assert_eq!(week.end_ms, monday + 7 * 86_400_000);
        }
        let next = week_bounds_in(date(2024, 5, 20), &Utc);
        assert_eq!(next.start_ms, monday + 7 * 86_400_000);
    }

    #[test]
    fn test_all_time_bounds_contains_everything_real() {
        let range = all_time_bounds();
        assert!(range.contains(0));
        assert!(range.contains(4_102_444_800_000));
        assert!(!range.contains(-1));
    }
}
