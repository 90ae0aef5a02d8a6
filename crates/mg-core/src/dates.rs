//! # Date normalization
//!
//! A stored display date may arrive as a timestamp or as a free-form string
//! ("December 5, 2024", "December 2024", "2024-11-02"). Records keep both a
//! human-readable display string and a comparable instant so feeds sort the
//! same way no matter which shape the store handed back.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display string substituted when a record carries no date at all.
pub const DATE_PLACEHOLDER: &str = "Date";

/// A normalized display date: what the page shows, and what feeds sort by.
///
/// Undated records get the earliest representable instant so they sort last
/// when a feed orders newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDate {
    pub display: String,
    pub instant: DateTime<Utc>,
}

impl DisplayDate {
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            display: long_date(instant),
            instant,
        }
    }

    pub fn missing() -> Self {
        Self {
            display: DATE_PLACEHOLDER.to_string(),
            instant: DateTime::<Utc>::MIN_UTC,
        }
    }

    /// Normalizes a raw store value. Numbers are epoch milliseconds; strings
    /// keep their original display form and parse to an instant when one of
    /// the known shapes matches. Anything else is the placeholder.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(Self::from_instant)
                .unwrap_or_else(Self::missing),
            Some(Value::String(raw)) if !raw.is_empty() => Self {
                display: raw.clone(),
                instant: parse_instant(raw).unwrap_or(DateTime::<Utc>::MIN_UTC),
            },
            _ => Self::missing(),
        }
    }
}

/// Long-form English date, e.g. "December 5, 2024".
pub fn long_date(instant: DateTime<Utc>) -> String {
    instant.format("%B %-d, %Y").to_string()
}

/// The month label used both for display and as a submission's scope key,
/// e.g. "December 2024".
pub fn month_label(instant: DateTime<Utc>) -> String {
    instant.format("%B %Y").to_string()
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return first_instant(date);
        }
    }
    // Month-year form ("December 2024") pins to the first of the month.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {raw}"), "%d %B %Y") {
        return first_instant(date);
    }
    None
}

fn first_instant(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}
