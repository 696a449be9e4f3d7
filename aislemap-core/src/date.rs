use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("unrecognized date: {0}")]
    Unparseable(String),

    #[error("local time does not exist: {0}")]
    NonexistentLocalTime(String),
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Formats an instant the way the server expects dates: UTC, millisecond
/// precision, `Z` suffix.
pub fn iso_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let utc = date.with_timezone(&Utc);
    utc.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a user-supplied date.
///
/// Strings with an offset are taken as-is. Strings without one, including
/// bare dates (midnight), are read in the local time zone.
pub fn parse_local_date(value: &str) -> Result<DateTime<Utc>, DateError> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateError::Unparseable(value.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
        .ok_or_else(|| DateError::NonexistentLocalTime(value.to_string()))
}

/// Converts a user-supplied date straight to the wire format.
pub fn iso_date_from_str(value: &str) -> Result<String, DateError> {
    parse_local_date(value).map(|d| iso_date(&d))
}
