//! crates/class_tracker_core/src/validation.rs
//!
//! Input normalization shared by every adapter: name sanitization and
//! due-date parsing. Everything user-supplied passes through here before
//! it reaches a store.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Rejected user input. Always the caller's fault, never the store's.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Name cannot be empty after sanitization")]
    EmptyAfterSanitization,
    #[error("Tag must be either 'assignment' or 'midterm', got '{0}'")]
    InvalidTag(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

static DATE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"));

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Trims the input and strips everything except ASCII letters, digits,
/// spaces, hyphens and underscores. Interior whitespace becomes a plain space.
pub fn sanitize_name(raw: &str) -> Result<String, ValidationError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ValidationError::EmptyAfterSanitization);
    }
    Ok(cleaned.to_string())
}

/// Normalizes a due date to a calendar day.
///
/// `YYYY-MM-DD` is taken as-is. Full timestamps keep the day they name in
/// their own offset, so no server timezone ever shifts the result.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidDate(raw.to_string());

    if DATE_ONLY.is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid());
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.date_naive());
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|stamp| stamp.date())
        .ok_or_else(invalid)
}
