//! Driver license domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manually entered driver license attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    pub legal_name: String,
    pub license_number: String,
    pub issuing_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_expiration_date: Option<NaiveDate>,
    pub verified: bool,
    /// First verification; kept across license re-entry.
    pub verified_at: DateTime<Utc>,
    /// Most recent successful verification.
    pub last_verified_at: DateTime<Utc>,
    #[serde(default)]
    pub expiration_alerts_sent: ExpirationAlertsSent,
}

/// When each expiration reminder was sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationAlertsSent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_week: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_days: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_day: Option<DateTime<Utc>>,
}

impl ExpirationAlertsSent {
    pub fn sent_at(&self, window: AlertWindow) -> Option<DateTime<Utc>> {
        match window {
            AlertWindow::OneWeek => self.one_week,
            AlertWindow::ThreeDays => self.three_days,
            AlertWindow::OneDay => self.one_day,
        }
    }

    pub fn record(&mut self, window: AlertWindow, at: DateTime<Utc>) {
        let slot = match window {
            AlertWindow::OneWeek => &mut self.one_week,
            AlertWindow::ThreeDays => &mut self.three_days,
            AlertWindow::OneDay => &mut self.one_day,
        };
        *slot = Some(at);
    }
}

/// The 7/3/1-day-before-expiration checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertWindow {
    OneWeek,
    ThreeDays,
    OneDay,
}

impl AlertWindow {
    pub const ALL: [AlertWindow; 3] = [
        AlertWindow::OneWeek,
        AlertWindow::ThreeDays,
        AlertWindow::OneDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertWindow::OneWeek => "oneWeek",
            AlertWindow::ThreeDays => "threeDays",
            AlertWindow::OneDay => "oneDay",
        }
    }
}

impl fmt::Display for AlertWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which reminders are due and not yet sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsNeeded {
    pub one_week: bool,
    pub three_days: bool,
    pub one_day: bool,
}

impl AlertsNeeded {
    pub fn is_needed(&self, window: AlertWindow) -> bool {
        match window {
            AlertWindow::OneWeek => self.one_week,
            AlertWindow::ThreeDays => self.three_days,
            AlertWindow::OneDay => self.one_day,
        }
    }

    /// Due windows in checkpoint order.
    pub fn due(&self) -> Vec<AlertWindow> {
        AlertWindow::ALL
            .into_iter()
            .filter(|window| self.is_needed(*window))
            .collect()
    }
}

/// Result of an expiration query for one license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationStatus {
    pub is_expired: bool,
    /// `None` once expired or when no expiration date is on file.
    pub days_until_expiration: Option<i64>,
    pub alerts_needed: AlertsNeeded,
}

// ============================================================================
// Request DTOs
// ============================================================================

/// License fields as submitted. All optional at the parse level; the policy
/// reports missing values as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInput {
    pub legal_name: Option<String>,
    pub license_number: Option<String>,
    pub license_expiration_date: Option<String>,
    pub issuing_state: Option<String>,
}

/// Request payload for PUT /api/v1/users/me/availability.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityRequest {
    pub available: bool,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Driver capability view of the current user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatusResponse {
    pub enabled: bool,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_info: Option<DriverInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_status: Option<ExpirationStatus>,
    /// Whether the license fields may be re-entered now.
    pub reupload_allowed: bool,
}
