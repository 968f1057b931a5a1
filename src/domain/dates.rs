// src/domain/dates.rs

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, Utc};

use crate::errors::ServerError;

/// Formats accepted for calendar dates coming in from clients.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d %B %Y", "%d/%m/%Y"];

/// Older clients stored `Date.toString()` output, e.g. "Fri Jan 31 00:00:00 GMT 2025".
const LEGACY_DATETIME_FORMAT: &str = "%a %b %d %H:%M:%S GMT %Y";

/// Parse a rent date as written by any client version. Returns None for
/// anything unrecognised; callers decide whether that is an error.
pub fn parse_rent_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, LEGACY_DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Boundary parse for optional date fields: blank is `None`, garbage is `BadRequest`.
pub fn parse_date_field(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ServerError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_rent_date(s)
            .map(Some)
            .ok_or_else(|| ServerError::BadRequest(format!("invalid {field}: {s}"))),
    }
}

/// One calendar month later, clamped to the end of shorter months.
pub fn add_one_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

pub fn format_timestamp(unix: i64) -> String {
    DateTime::<Utc>::from_timestamp(unix, 0)
        .map(|dt| dt.format("%d %b %Y %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// "31 Jan 2025"
pub fn format_display(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// "Fri Jan 31 2025"
pub fn format_long(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}
