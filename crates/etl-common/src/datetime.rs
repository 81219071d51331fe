//! Date/time cell parsing.
//!
//! Source files carry dates in a handful of layouts. Every accepted layout is
//! parsed to a `NaiveDateTime` (date-only values at midnight); anything else is
//! reported as missing so the row can be disqualified downstream.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use polars::prelude::{AnyValue, TimeUnit};

const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y", // US: 01/15/2024
    "%d-%b-%Y", // 15-Jan-2024
    "%d %B %Y", // 15 January 2024
];

/// Parse a date or date/time string.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use etl_common::parse_datetime;
///
/// let midnight = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// assert_eq!(parse_datetime("2024-01-15"), Some(midnight));
/// assert_eq!(parse_datetime("01/15/2024"), Some(midnight));
/// assert_eq!(parse_datetime("not a date"), None);
/// ```
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for fmt in &DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in &DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Converts an `AnyValue` holding a date, datetime or date string.
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Datetime(v, unit, _) => from_timestamp(v, unit),
        AnyValue::Date(days) => DateTime::UNIX_EPOCH
            .date_naive()
            .checked_add_signed(TimeDelta::try_days(i64::from(days))?)
            .map(|d| d.and_time(NaiveTime::MIN)),
        AnyValue::String(s) => parse_datetime(s),
        AnyValue::StringOwned(s) => parse_datetime(&s),
        _ => None,
    }
}

/// Milliseconds since the Unix epoch, the physical layout of standardized date columns.
pub fn datetime_to_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

/// Formats a timestamp the way it is written to the relational store.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let secs = value.div_euclid(per_second);
    let sub = value.rem_euclid(per_second);
    let nanos = u32::try_from(sub * (1_000_000_000 / per_second)).ok()?;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_iso_and_spaced_datetimes() {
        assert_eq!(
            parse_datetime("2024-02-01T10:30:00"),
            Some(ymd_hms(2024, 2, 1, 10, 30, 0))
        );
        assert_eq!(
            parse_datetime("2024-02-01 10:30:00"),
            Some(ymd_hms(2024, 2, 1, 10, 30, 0))
        );
        assert_eq!(
            parse_datetime("2024-02-01T10:30:00Z"),
            Some(ymd_hms(2024, 2, 1, 10, 30, 0))
        );
    }

    #[test]
    fn parses_date_only_at_midnight() {
        assert_eq!(parse_datetime("2024/02/01"), Some(ymd_hms(2024, 2, 1, 0, 0, 0)));
        assert_eq!(parse_datetime("01-Feb-2024"), Some(ymd_hms(2024, 2, 1, 0, 0, 0)));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime("2024-02-30"), None);
    }

    #[test]
    fn datetime_anyvalue_round_trips_through_millis() {
        let value = ymd_hms(2023, 12, 31, 23, 59, 59);
        let millis = datetime_to_millis(value);
        assert_eq!(
            any_to_datetime(AnyValue::Datetime(millis, TimeUnit::Milliseconds, None)),
            Some(value)
        );
    }

    #[test]
    fn date_anyvalue_counts_days_from_epoch() {
        assert_eq!(
            any_to_datetime(AnyValue::Date(1)),
            Some(ymd_hms(1970, 1, 2, 0, 0, 0))
        );
    }

    #[test]
    fn formats_for_storage() {
        assert_eq!(
            format_datetime(ymd_hms(2024, 1, 1, 0, 0, 0)),
            "2024-01-01 00:00:00"
        );
    }
}
