use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::error::{AppError, AppResult};

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").unwrap());

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping the calendar
/// date as written.
pub fn parse_calendar_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::validation(format!("{} must be a valid date (YYYY-MM-DD)", field)))
}

pub fn require_date(field: &str, value: Option<&str>) -> AppResult<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_calendar_date(field, value),
        None => Err(AppError::validation(format!("{} is required", field))),
    }
}

/// Strict two-digit `HH:mm` shape. Range and ordering are not checked.
pub fn is_valid_time(value: &str) -> bool {
    TIME_PATTERN.is_match(value)
}

pub fn require_time(field: &str, value: Option<&str>) -> AppResult<String> {
    match value {
        Some(value) if is_valid_time(value) => Ok(value.to_string()),
        Some(_) => Err(AppError::validation(format!(
            "{} must use HH:mm format",
            field
        ))),
        None => Err(AppError::validation(format!("{} is required", field))),
    }
}

pub fn require_text(field: &str, value: Option<String>) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("{} is required", field)))
}
