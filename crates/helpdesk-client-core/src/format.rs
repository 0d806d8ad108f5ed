//! Display formatting shared by the web renderer and the CLI.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `in_progress` -> `In Progress`. Only the first underscore is replaced.
#[must_use]
pub fn format_status(status: &str) -> String {
    status
        .replacen('_', " ", 1)
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Jan 5, 2025`, in the viewer's local time zone. Unparsable input is
/// returned as-is.
#[must_use]
pub fn format_date(raw: &str) -> String {
    format_date_in(raw, &Local)
}

/// [`format_date`] rendered in an explicit zone.
#[must_use]
pub fn format_date_in<Tz: TimeZone>(raw: &str, zone: &Tz) -> String {
    match parse_timestamp(raw) {
        Some(Timestamp::Date(date)) => date.format(DATE_FORMAT).to_string(),
        Some(timestamp) => timestamp.wall_clock(zone).format(DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// `Jan 5, 2025, 02:30 PM`, in the viewer's local time zone. Timestamps
/// without an offset are shown as written.
#[must_use]
pub fn format_date_time(raw: &str) -> String {
    format_date_time_in(raw, &Local)
}

/// [`format_date_time`] rendered in an explicit zone.
#[must_use]
pub fn format_date_time_in<Tz: TimeZone>(raw: &str, zone: &Tz) -> String {
    match parse_timestamp(raw) {
        Some(timestamp) => timestamp
            .wall_clock(zone)
            .format(DATE_TIME_FORMAT)
            .to_string(),
        None => raw.to_string(),
    }
}

const DATE_FORMAT: &str = "%b %-d, %Y";
const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

enum Timestamp {
    Date(NaiveDate),
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl Timestamp {
    fn wall_clock<Tz: TimeZone>(&self, zone: &Tz) -> NaiveDateTime {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::default()),
            Self::Naive(at) => *at,
            Self::Zoned(at) => at.with_timezone(zone).naive_local(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Some(Timestamp::Zoned(at));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(Timestamp::Naive(at));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(Timestamp::Date)
}

/// Human file size on a 1024 base, rounded to two decimals.
#[must_use]
pub fn format_file_size(bytes: Option<i64>) -> String {
    let bytes = match bytes {
        Some(bytes) if bytes > 0 => bytes,
        _ => return "0 Bytes".to_string(),
    };
    let mut unit = 0;
    let mut scale = 1_i64;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }
    let value = ((bytes as f64 / scale as f64) * 100.0).round() / 100.0;
    format!("{value} {}", SIZE_UNITS[unit])
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
