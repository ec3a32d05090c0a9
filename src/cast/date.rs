//! Date detection against an ordered list of chrono format patterns

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format keyword selecting RFC 3339 parsing instead of a strftime pattern
pub const RFC3339_FORMAT: &str = "rfc3339";

/// Formats tried when the configuration names none
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    RFC3339_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d",
];

/// Parse `raw` with the first matching format.
///
/// Each pattern is tried as an offset-aware timestamp, then as a naive
/// date-time (taken as UTC), then as a bare date at midnight UTC.
pub fn parse_date(raw: &str, formats: &[String]) -> Option<DateTime<Utc>> {
    formats.iter().find_map(|format| parse_with(raw, format))
}

fn parse_with(raw: &str, format: &str) -> Option<DateTime<Utc>> {
    if format == RFC3339_FORMAT {
        return DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, format) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Check that chrono can compile `format`
pub fn validate_date_format(format: &str) -> bool {
    format == RFC3339_FORMAT || !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
