//! Timestamp parsing and window arithmetic helpers

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Canonical textual form used for timestamps in exported tables and in
/// exact-row removal.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted datetime layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Parse a timestamp cell from an input table.
///
/// Accepts ISO-like layouts with a space or `T` separator, optional
/// fractional seconds, minute precision, a handful of regional layouts and
/// bare dates (interpreted as midnight). Surrounding whitespace is ignored.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a timestamp that must be in exactly [`TIMESTAMP_FORMAT`]
pub fn parse_strict(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

/// Format a timestamp in [`TIMESTAMP_FORMAT`]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Half of a total window given in whole minutes.
///
/// Computed in milliseconds so an odd minute count splits exactly.
pub fn half_window(window_minutes: u32) -> Duration {
    Duration::milliseconds(i64::from(window_minutes) * 60_000 / 2)
}
