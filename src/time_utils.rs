// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.
//!
//! The backend hands out dates in several shapes (`2024-03-10`,
//! `2024-03-10 18:00:00` from SQLite defaults, full RFC 3339), so everything
//! that buckets or orders workouts goes through these helpers.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a date the way workout `date` fields are stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse any of the backend's date shapes into a UTC timestamp.
///
/// Date-only values are taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar date of a backend date value.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|dt| dt.date_naive())
}

/// The Sunday starting the week that contains `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = i64::from(date.weekday().num_days_from_sunday());
    date - Duration::days(days_from_sunday)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_shapes() {
        let rfc = parse_timestamp("2024-03-10T18:30:00Z").unwrap();
        assert_eq!(format_utc_rfc3339(rfc), "2024-03-10T18:30:00Z");

        let offset = parse_timestamp("2024-03-10T18:30:00+02:00").unwrap();
        assert_eq!(format_utc_rfc3339(offset), "2024-03-10T16:30:00Z");

        let sqlite = parse_timestamp("2024-03-10 18:30:00").unwrap();
        assert_eq!(format_utc_rfc3339(sqlite), "2024-03-10T18:30:00Z");

        let millis = parse_timestamp("2024-03-10T18:30:00.123").unwrap();
        assert_eq!(millis.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        let date_only = parse_timestamp("2024-03-10").unwrap();
        assert_eq!(format_utc_rfc3339(date_only), "2024-03-10T00:00:00Z");

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-03-10 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(week_start(sunday), sunday);

        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        assert_eq!(week_start(wednesday), sunday);

        let saturday = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        assert_eq!(week_start(saturday), sunday);

        let next_sunday = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(week_start(next_sunday), next_sunday);
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(d), "2024-01-05");
        assert_eq!(parse_date("2024-01-05T23:59:59Z"), Some(d));
    }
}
