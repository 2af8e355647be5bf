//! Driver capability operations for the current user.

use std::sync::Arc;

use domain::models::driver::{DriverStatusResponse, LicenseInput};
use domain::models::User;
use domain::services::driver_policy;
use domain::store::UserStore;
use domain::DomainError;
use shared::clock::Clock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::app::AppState;

pub struct DriverService {
    users: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    write_gate: Arc<Mutex<()>>,
}

impl DriverService {
    pub fn new(users: Arc<dyn UserStore>, clock: Arc<dyn Clock>, write_gate: Arc<Mutex<()>>) -> Self {
        Self {
            users,
            clock,
            write_gate,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.stores.users.clone(),
            state.clock.clone(),
            state.write_gate.clone(),
        )
    }

    pub async fn user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User".to_string()))
    }

    /// Driver view with expiration status and re-entry eligibility.
    pub async fn status(&self, user_id: Uuid) -> Result<DriverStatusResponse, DomainError> {
        let user = self.user(user_id).await?;
        Ok(self.describe(&user))
    }

    pub async fn enable(
        &self,
        user_id: Uuid,
        input: &LicenseInput,
    ) -> Result<DriverStatusResponse, DomainError> {
        self.mutate(user_id, "enable", |user, now, today| {
            driver_policy::enable(user, input, now, today)
        })
        .await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        input: &LicenseInput,
    ) -> Result<DriverStatusResponse, DomainError> {
        self.mutate(user_id, "update", |user, now, today| {
            driver_policy::update(user, input, now, today)
        })
        .await
    }

    /// Re-checks the stored license; an expired one is a policy violation.
    pub async fn verify(&self, user_id: Uuid) -> Result<DriverStatusResponse, DomainError> {
        self.mutate(user_id, "verify", |user, now, today| {
            if user.driver_info.is_none() {
                return Err(DomainError::NotFound("Driver info".to_string()));
            }
            driver_policy::verify_stored(user, now, today)
                .ok_or_else(|| DomainError::Policy("driver license expired".to_string()))
        })
        .await
    }

    pub async fn set_availability(
        &self,
        user_id: Uuid,
        available: bool,
    ) -> Result<DriverStatusResponse, DomainError> {
        self.mutate(user_id, "set_availability", |user, now, today| {
            driver_policy::set_availability(user, available, now, today)
        })
        .await
    }

    async fn mutate<F>(
        &self,
        user_id: Uuid,
        operation: &'static str,
        rule: F,
    ) -> Result<DriverStatusResponse, DomainError>
    where
        F: FnOnce(User, chrono::DateTime<chrono::Utc>, chrono::NaiveDate) -> Result<User, DomainError>,
    {
        let _guard = self.write_gate.lock().await;

        let user = self.user(user_id).await?;
        let user = rule(user, self.clock.now(), self.clock.today()).map_err(|e| {
            tracing::info!(user_id = %user_id, operation, error = %e, "Driver operation rejected");
            e
        })?;
        let user = self.users.put(user).await?;

        tracing::info!(
            user_id = %user_id,
            operation,
            available = user.driver_available,
            "Driver profile updated"
        );
        Ok(self.describe(&user))
    }

    fn describe(&self, user: &User) -> DriverStatusResponse {
        let today = self.clock.today();
        let expiration = user
            .driver_info
            .as_ref()
            .and_then(|info| info.license_expiration_date);

        DriverStatusResponse {
            enabled: user.driver_info.is_some(),
            available: user.driver_available,
            expiration_status: user
                .driver_info
                .as_ref()
                .map(|info| driver_policy::expiration_status(info, today)),
            reupload_allowed: driver_policy::reupload_allowed(expiration, today),
            driver_info: user.driver_info.clone(),
        }
    }
}
