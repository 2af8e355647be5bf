//! Common field validators.
//!
//! Each validator returns a [`validator::ValidationError`] carrying a
//! user-facing message, so they plug into `#[derive(Validate)]` DTOs and into
//! the hand-ordered checks of the rule engines alike.

use chrono::NaiveDate;
use validator::ValidationError;

lazy_static::lazy_static! {
    /// 24-hour wall-clock time, `HH:MM`.
    static ref TIME_OF_DAY_REGEX: regex::Regex =
        regex::Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Two-letter codes of the recognized license issuing states (50 states + DC).
pub const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects empty or whitespace-only values.
pub fn validate_not_blank(value: &str, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("required", format!("{} is required", label)))
    } else {
        Ok(())
    }
}

/// Validates a `HH:MM` 24-hour time string.
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "time_format",
            format!("'{}' is not a valid time (expected HH:MM)", value),
        ))
    }
}

/// Normalizes an issuing state to its uppercase two-letter code.
pub fn normalize_state_code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Validates that the value names a recognized issuing state.
pub fn validate_issuing_state(value: &str) -> Result<(), ValidationError> {
    let code = normalize_state_code(value);
    if US_STATE_CODES.contains(&code.as_str()) {
        Ok(())
    } else {
        Err(error(
            "issuing_state",
            format!("'{}' is not a recognized issuing state", value.trim()),
        ))
    }
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        error(
            "date_format",
            format!("'{}' is not a valid date (expected YYYY-MM-DD)", value.trim()),
        )
    })
}

/// Rejects values longer than `max` characters.
pub fn validate_max_chars(value: &str, max: usize, label: &str) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(error(
            "too_long",
            format!("{} must be at most {} characters", label, max),
        ))
    } else {
        Ok(())
    }
}
