//! Report period parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shared::error::AppError;

/// Parse a period bound into Unix millis
///
/// Accepts RFC 3339 (`2025-01-31T12:00:00Z`), a naive datetime
/// (`2025-01-31T12:00:00`, read as UTC), or a plain date. A plain date
/// means the start of that day, or its last millisecond when `end_of_day`.
pub fn parse_bound(value: &str, field: &str, end_of_day: bool) -> Result<i64, AppError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.and_utc().timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(dt) = time {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    Err(AppError::invalid_request(format!(
        "{field} must be a date (YYYY-MM-DD) or an ISO 8601 datetime"
    ))
    .with_detail("field", field))
}
