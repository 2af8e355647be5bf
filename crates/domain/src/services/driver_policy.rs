//! Driver license policy.
//!
//! Decides whether a user's manually entered license is acceptable, whether
//! they may be listed as available to drive, and which expiration reminders
//! are due. All functions are pure; the caller supplies `now` and `today`.

use chrono::{DateTime, Months, NaiveDate, Utc};

use crate::error::DomainError;
use crate::models::driver::{
    AlertWindow, AlertsNeeded, DriverInfo, ExpirationAlertsSent, ExpirationStatus, LicenseInput,
};
use crate::models::user::User;
use shared::validation::{
    normalize_state_code, parse_calendar_date, validate_issuing_state, validate_not_blank,
};

/// Furthest accepted expiration date, in months after today.
pub const MAX_EXPIRATION_MONTHS_AHEAD: u32 = 120;

/// Days before expiration from which a license may be re-entered.
pub const REUPLOAD_WINDOW_DAYS: i64 = 7;

/// License fields that passed validation, normalized for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLicense {
    pub legal_name: String,
    pub license_number: String,
    pub license_expiration_date: NaiveDate,
    pub issuing_state: String,
}

fn required_field(value: &Option<String>, field: &str) -> Result<String, DomainError> {
    let value = value.as_deref().unwrap_or_default();
    validate_not_blank(value, field).map_err(|e| DomainError::from_field(field, e))?;
    Ok(value.trim().to_string())
}

fn expiration_field(value: &Option<String>, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    const FIELD: &str = "licenseExpirationDate";

    let raw = required_field(value, FIELD)?;
    let date = parse_calendar_date(&raw).map_err(|e| DomainError::from_field(FIELD, e))?;

    if let Some(limit) = today.checked_add_months(Months::new(MAX_EXPIRATION_MONTHS_AHEAD)) {
        if date > limit {
            return Err(DomainError::validation(
                FIELD,
                "licenseExpirationDate must be within 10 years from today",
            ));
        }
    }
    Ok(date)
}

fn state_field(value: &Option<String>) -> Result<String, DomainError> {
    const FIELD: &str = "issuingState";

    let raw = required_field(value, FIELD)?;
    validate_issuing_state(&raw).map_err(|e| DomainError::from_field(FIELD, e))?;
    Ok(normalize_state_code(&raw))
}

/// Checks every license field and reports the first failure in field order.
pub fn validate(input: &LicenseInput, today: NaiveDate) -> Result<ValidLicense, DomainError> {
    let legal_name = required_field(&input.legal_name, "legalName");
    let license_number = required_field(&input.license_number, "licenseNumber");
    let expiration = expiration_field(&input.license_expiration_date, today);
    let state = state_field(&input.issuing_state);

    Ok(ValidLicense {
        legal_name: legal_name?,
        license_number: license_number?,
        license_expiration_date: expiration?,
        issuing_state: state?,
    })
}

/// Turns on the driver capability for a user without one.
pub fn enable(
    user: User,
    input: &LicenseInput,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<User, DomainError> {
    if user.driver_info.is_some() {
        return Err(DomainError::Conflict(
            "Driver capability is already enabled".to_string(),
        ));
    }
    let license = validate(input, today)?;

    let mut user = user;
    user.driver_info = Some(DriverInfo {
        legal_name: license.legal_name,
        license_number: license.license_number,
        issuing_state: license.issuing_state,
        license_expiration_date: Some(license.license_expiration_date),
        verified: true,
        verified_at: now,
        last_verified_at: now,
        expiration_alerts_sent: ExpirationAlertsSent::default(),
    });
    user.driver_available = true;
    user.updated_at = now;
    Ok(user)
}

/// Replaces the license fields and restarts the alert cycle.
pub fn update(
    user: User,
    input: &LicenseInput,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<User, DomainError> {
    let Some(existing) = user.driver_info.as_ref() else {
        return Err(DomainError::NotFound("Driver info".to_string()));
    };
    let license = validate(input, today)?;
    let verified_at = existing.verified_at;

    let mut user = user;
    user.driver_info = Some(DriverInfo {
        legal_name: license.legal_name,
        license_number: license.license_number,
        issuing_state: license.issuing_state,
        license_expiration_date: Some(license.license_expiration_date),
        verified: true,
        verified_at,
        last_verified_at: now,
        expiration_alerts_sent: ExpirationAlertsSent::default(),
    });
    user.updated_at = now;
    Ok(user)
}

/// Re-checks the stored license. Returns `None` when there is no license on
/// file or it expired before `today`; otherwise stamps `last_verified_at`.
pub fn verify_stored(user: User, now: DateTime<Utc>, today: NaiveDate) -> Option<User> {
    let info = user.driver_info.as_ref()?;
    if let Some(expiration) = info.license_expiration_date {
        if expiration < today {
            return None;
        }
    }

    let mut user = user;
    if let Some(info) = user.driver_info.as_mut() {
        info.last_verified_at = now;
    }
    user.updated_at = now;
    Some(user)
}

/// Toggles the "available to drive" flag.
pub fn set_availability(
    user: User,
    available: bool,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<User, DomainError> {
    if !available {
        let mut user = user;
        user.driver_available = false;
        user.updated_at = now;
        return Ok(user);
    }

    if user.driver_info.is_none() {
        return Err(DomainError::Policy(
            "driver capability not enabled".to_string(),
        ));
    }
    let mut user = verify_stored(user, now, today)
        .ok_or_else(|| DomainError::Policy("driver license expired".to_string()))?;
    user.driver_available = true;
    Ok(user)
}

/// Whether the license may be re-entered today.
pub fn reupload_allowed(expiration: Option<NaiveDate>, today: NaiveDate) -> bool {
    match expiration {
        None => true,
        Some(date) => (date - today).num_days() <= REUPLOAD_WINDOW_DAYS,
    }
}

/// Expiration state and due reminders for one license.
pub fn expiration_status(info: &DriverInfo, today: NaiveDate) -> ExpirationStatus {
    let Some(expiration) = info.license_expiration_date else {
        return ExpirationStatus {
            is_expired: false,
            days_until_expiration: None,
            alerts_needed: AlertsNeeded::default(),
        };
    };

    let days = (expiration - today).num_days();
    if days < 0 {
        return ExpirationStatus {
            is_expired: true,
            days_until_expiration: None,
            alerts_needed: AlertsNeeded::default(),
        };
    }

    let unsent = |window| info.expiration_alerts_sent.sent_at(window).is_none();
    ExpirationStatus {
        is_expired: false,
        days_until_expiration: Some(days),
        alerts_needed: AlertsNeeded {
            one_week: days > 3 && days <= 7 && unsent(AlertWindow::OneWeek),
            three_days: days > 1 && days <= 3 && unsent(AlertWindow::ThreeDays),
            one_day: days == 1 && unsent(AlertWindow::OneDay),
        },
    }
}

/// Records that the reminder for `window` went out at `now`.
pub fn mark_alert_sent(info: DriverInfo, window: AlertWindow, now: DateTime<Utc>) -> DriverInfo {
    let mut info = info;
    info.expiration_alerts_sent.record(window, now);
    info
}
