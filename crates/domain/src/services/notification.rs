//! Notification service for driver-facing reminders.
//!
//! Delivery is abstracted behind [`NotificationService`]; the only shipped
//! implementation logs instead of sending.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AlertWindow;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    LicenseExpiration,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::LicenseExpiration => write!(f, "license_expiration"),
        }
    }
}

/// Reminder that a driver's license is about to expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseExpirationPayload {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub user_id: Uuid,
    pub email: String,
    pub window: AlertWindow,
    pub license_expiration_date: NaiveDate,
    pub days_until_expiration: i64,
    pub timestamp: DateTime<Utc>,
}

/// Result of a notification send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was sent successfully.
    Sent,
    /// Sending failed; the caller decides whether to retry later.
    Failed(String),
}

impl NotificationResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotificationResult::Sent)
    }
}

#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_license_expiration(&self, payload: LicenseExpirationPayload)
        -> NotificationResult;
}

/// Mock notification service for development and testing.
///
/// Logs notifications and keeps a copy of each one it accepted.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<LicenseExpirationPayload>>>,
}

impl MockNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Payloads accepted so far, in send order.
    pub fn sent(&self) -> Vec<LicenseExpirationPayload> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send_license_expiration(
        &self,
        payload: LicenseExpirationPayload,
    ) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                user_id = %payload.user_id,
                window = %payload.window,
                "Mock notification service simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            user_id = %payload.user_id,
            email = %payload.email,
            window = %payload.window,
            expires_on = %payload.license_expiration_date,
            days_until_expiration = payload.days_until_expiration,
            "Mock: Would send license_expiration notification"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(payload);
        }
        NotificationResult::Sent
    }
}
