// ABOUTME: Date extraction from the showtime formats used by cinema APIs and pages.
// ABOUTME: Handles ISO datetimes with or without offsets, bare dates, and unix timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Extracts the calendar day of a showtime string.
///
/// The day is taken from the wall-clock time as written, so an offset such as
/// `-05:00` never moves a late show onto the next day.
pub fn parse_show_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let formats_with_tz = [
        // Compact offset: "2024-03-01T19:30:00-0500"
        "%Y-%m-%dT%H:%M:%S%z",
        // Fractional seconds with offset: "2024-03-01T19:30:00.000-05:00"
        "%Y-%m-%dT%H:%M:%S%.f%:z",
    ];
    for fmt in &formats_with_tz {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    let formats_naive = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in &formats_naive {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Converts a unix timestamp (seconds) to a day in the local time zone.
pub fn local_date_from_timestamp(secs: i64) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(&Local).date_naive())
}

/// Like [`local_date_from_timestamp`] but accepts the textual form found in attributes.
pub fn parse_timestamp_date(s: &str) -> Option<NaiveDate> {
    local_date_from_timestamp(s.trim().parse::<i64>().ok()?)
}

/// Unix timestamp of local midnight at the start of `day`.
pub fn local_midnight_timestamp(day: NaiveDate) -> Option<i64> {
    let naive = day.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}
