use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const CLOCK_FORMAT: &str = "%H:%M:%S";
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    /// `datetime.isoformat()` without an offset, as the backend emits it.
    const NAIVE_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
}

// Time Helper functions

/// Epoch seconds (possibly fractional) to UTC. `None` for NaN/out of range.
pub fn epoch_secs_to_utc(epoch_secs: f64) -> Option<DateTime<Utc>> {
    if !epoch_secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((epoch_secs * TimeUtils::MS_IN_S as f64).round() as i64)
}

/// Lenient parse of backend timestamps: RFC 3339 first, then naive ISO-8601.
pub fn parse_backend_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, TimeUtils::NAIVE_ISO_FORMAT).ok()
}

pub fn format_clock(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format(TimeUtils::CLOCK_FORMAT)
        .to_string()
}

pub fn format_naive(ts: &NaiveDateTime) -> String {
    ts.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m {}s", mins, secs % 60);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h {}m", hours, mins % 60);
    }
    let days = hours / 24;
    format!("{}d {}h", days, hours % 24)
}
