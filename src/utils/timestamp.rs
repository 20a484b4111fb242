use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

/// Formats tried, in order, for timestamps without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Smallest number treated as Unix epoch seconds (2001-09-09).
const MIN_EPOCH_SECONDS: i64 = 1_000_000_000;

/// Parse a best-effort timestamp into its wall-clock hour (0-23).
///
/// Timestamps with an offset keep the hour as written rather than being
/// shifted to UTC. Date-only values fall on hour 0 and bare integers are read
/// as Unix epoch seconds (UTC).
pub fn hour_of(timestamp: &str) -> Option<u32> {
    let timestamp = timestamp.trim();
    if timestamp.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.hour());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(timestamp) {
        return Some(dt.hour());
    }
    // Offsets without a colon, e.g. 2024-01-01T10:00:00+0000
    if let Ok(dt) = DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.hour());
    }
    if let Ok(dt) = DateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f%z") {
        return Some(dt.hour());
    }
    // Trailing UTC designators that RFC 3339 parsing rejects
    if let Some(naive) = timestamp
        .strip_suffix(" UTC")
        .or_else(|| timestamp.strip_suffix('Z'))
        && let Some(hour) = naive_hour(naive)
    {
        return Some(hour);
    }
    if let Some(hour) = naive_hour(timestamp) {
        return Some(hour);
    }
    if DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(timestamp, format).is_ok())
    {
        return Some(0);
    }

    timestamp
        .parse::<i64>()
        .ok()
        .filter(|seconds| *seconds >= MIN_EPOCH_SECONDS)
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .map(|dt| dt.hour())
}

fn naive_hour(timestamp: &str) -> Option<u32> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .map(|dt| dt.hour())
}
