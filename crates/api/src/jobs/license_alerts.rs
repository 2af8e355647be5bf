//! Driver license expiration reminders.
//!
//! Each run walks every user with driver info, works out which of the
//! one-week / three-day / one-day reminders are due and unsent, and hands
//! them to the [`NotificationService`]. A reminder is only recorded as sent
//! when delivery succeeded, so failures are retried on the next run.

use std::sync::Arc;

use chrono::NaiveDate;
use domain::models::{AlertWindow, User};
use domain::services::driver_policy::{expiration_status, mark_alert_sent};
use domain::services::{
    LicenseExpirationPayload, NotificationResult, NotificationService, NotificationType,
};
use domain::store::{StoreError, UserStore};
use shared::clock::Clock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_license_alert_sent;

/// Counts from one pass over the user base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertRunSummary {
    pub drivers_checked: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

pub struct LicenseExpirationAlertJob {
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
    write_gate: Arc<Mutex<()>>,
    interval_minutes: u64,
}

impl LicenseExpirationAlertJob {
    pub fn new(
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationService>,
        clock: Arc<dyn Clock>,
        write_gate: Arc<Mutex<()>>,
        interval_minutes: u64,
    ) -> Self {
        Self {
            users,
            notifications,
            clock,
            write_gate,
            interval_minutes,
        }
    }

    /// Runs one pass and reports what happened.
    ///
    /// Delivery happens outside the write gate. The gate is taken only to
    /// record the windows that went out.
    pub async fn run_once(&self) -> Result<AlertRunSummary, StoreError> {
        let mut summary = AlertRunSummary::default();

        let drivers: Vec<User> = self
            .users
            .list()
            .await?
            .into_iter()
            .filter(|user| user.driver_info.is_some())
            .collect();

        for user in drivers {
            summary.drivers_checked += 1;

            let Some((expires_on, payloads)) = self.due_alerts(&user) else {
                continue;
            };

            let mut delivered = Vec::new();
            for payload in payloads {
                let window = payload.window;
                match self.notifications.send_license_expiration(payload).await {
                    NotificationResult::Sent => {
                        record_license_alert_sent(window.as_str());
                        delivered.push(window);
                    }
                    NotificationResult::Failed(reason) => {
                        warn!(user_id = %user.id, %window, %reason, "License alert not delivered");
                        summary.alerts_failed += 1;
                    }
                }
            }

            summary.alerts_sent += delivered.len();
            if !delivered.is_empty() {
                self.record_delivered(user.id, expires_on, &delivered).await?;
            }
        }

        Ok(summary)
    }

    /// Builds one payload per due, unsent window. `None` when nothing is due.
    fn due_alerts(&self, user: &User) -> Option<(NaiveDate, Vec<LicenseExpirationPayload>)> {
        let info = user.driver_info.as_ref()?;
        let status = expiration_status(info, self.clock.today());
        let expires_on = info.license_expiration_date?;
        let days = status.days_until_expiration?;

        let now = self.clock.now();
        let payloads: Vec<_> = status
            .alerts_needed
            .due()
            .into_iter()
            .map(|window| LicenseExpirationPayload {
                notification_type: NotificationType::LicenseExpiration,
                user_id: user.id,
                email: user.email.clone(),
                window,
                license_expiration_date: expires_on,
                days_until_expiration: days,
                timestamp: now,
            })
            .collect();

        (!payloads.is_empty()).then_some((expires_on, payloads))
    }

    /// Marks delivered windows on a fresh copy of the user. Skipped when the
    /// license was re-entered with another expiration date meanwhile.
    async fn record_delivered(
        &self,
        user_id: Uuid,
        expires_on: NaiveDate,
        delivered: &[AlertWindow],
    ) -> Result<(), StoreError> {
        let _guard = self.write_gate.lock().await;

        let Some(mut user) = self.users.get(user_id).await? else {
            return Ok(());
        };
        let Some(mut info) = user.driver_info.take() else {
            return Ok(());
        };
        if info.license_expiration_date != Some(expires_on) {
            debug!(user_id = %user_id, "License changed during delivery, alerts not recorded");
            return Ok(());
        }

        let now = self.clock.now();
        let mut changed = false;
        for window in delivered {
            if info.expiration_alerts_sent.sent_at(*window).is_none() {
                info = mark_alert_sent(info, *window, now);
                changed = true;
            }
        }
        if !changed {
            return Ok(());
        }

        user.driver_info = Some(info);
        user.updated_at = now;
        self.users.put(user).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Job for LicenseExpirationAlertJob {
    fn name(&self) -> &'static str {
        "license_expiration_alerts"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let summary = self.run_once().await.map_err(|e| e.to_string())?;
        if summary.alerts_sent + summary.alerts_failed > 0 {
            info!(
                drivers_checked = summary.drivers_checked,
                alerts_sent = summary.alerts_sent,
                alerts_failed = summary.alerts_failed,
                "License expiration alerts processed"
            );
        } else {
            debug!(drivers_checked = summary.drivers_checked, "No license alerts due");
        }
        Ok(())
    }
}
