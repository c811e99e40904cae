//! Fixed-layout HTTP timestamps.
//!
//! Layout: `Mon, 2 Jan 2006 15:04:05 GMT` (weekday, unpadded day, month,
//! year, time, zone abbreviation). Formatting always uses UTC and `GMT`.
//! Parsing accepts any alphabetic zone abbreviation and treats it as UTC.

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};

const LAYOUT: &str = "%a, %-d %b %Y %H:%M:%S";

/// Format `time` for a `Last-Modified` header.
pub fn format_http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    format!("{} GMT", time.format(LAYOUT))
}

/// Parse an `If-Modified-Since` value. `None` if it does not match the layout.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let (stamp, zone) = value.trim().rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(stamp, LAYOUT).ok()?;
    Some(naive.and_utc().into())
}

/// Whether two instants fall in the same whole second.
pub(crate) fn same_second(a: SystemTime, b: SystemTime) -> bool {
    DateTime::<Utc>::from(a).timestamp() == DateTime::<Utc>::from(b).timestamp()
}
