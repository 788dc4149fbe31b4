//! Date window resolution for the modified-date filter.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Named date windows offered by the date filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePreset {
    Today,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    LastYear,
    Custom,
}

/// Inclusive millisecond window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis <= self.end
    }
}

/// Resolve a preset to a concrete window ending now.
///
/// `custom` uses the explicit bounds; a missing start defaults to the epoch
/// and a missing end to now.
pub fn resolve_date_range(preset: DatePreset, custom_start: Option<i64>, custom_end: Option<i64>) -> DateRange {
    resolve_date_range_at(preset, custom_start, custom_end, Local::now())
}

/// Same as [`resolve_date_range`] with an explicit clock.
pub fn resolve_date_range_at(
    preset: DatePreset,
    custom_start: Option<i64>,
    custom_end: Option<i64>,
    now: DateTime<Local>,
) -> DateRange {
    let now_ms = now.timestamp_millis();

    match preset {
        DatePreset::Today => DateRange {
            start: local_midnight(now).unwrap_or(now_ms),
            end: now_ms,
        },
        DatePreset::Last7Days => DateRange {
            start: now_ms - 7 * DAY_MS,
            end: now_ms,
        },
        DatePreset::Last30Days => DateRange {
            start: now_ms - 30 * DAY_MS,
            end: now_ms,
        },
        DatePreset::LastYear => DateRange {
            start: now_ms - 365 * DAY_MS,
            end: now_ms,
        },
        DatePreset::Custom => DateRange {
            start: custom_start.unwrap_or(0),
            end: custom_end.unwrap_or(now_ms),
        },
    }
}

fn local_midnight(now: DateTime<Local>) -> Option<i64> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Milliseconds for "one year ago" relative to now
pub fn one_year_ago() -> i64 {
    Utc::now().timestamp_millis() - 365 * DAY_MS
}

/// Parse a pre-formatted display date into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (local
/// time) and bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_display_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
