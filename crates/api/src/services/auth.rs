//! Account registration and password login.

use std::sync::Arc;

use domain::models::user::normalize_email;
use domain::models::User;
use domain::store::{StoreError, UserStore};
use shared::clock::Clock;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{check_password_length, hash_password, verify_password, PasswordError};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::WeakPassword(message) => ApiError::Validation {
                field: Some("password".to_string()),
                message,
            },
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::TokenError(_) | AuthError::PasswordError(_) | AuthError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtConfig>,
    clock: Arc<dyn Clock>,
    write_gate: Arc<Mutex<()>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt: Arc<JwtConfig>,
        clock: Arc<dyn Clock>,
        write_gate: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            users,
            jwt,
            clock,
            write_gate,
        }
    }

    /// Register a new user with email and password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthResult, AuthError> {
        if let Some(message) = check_password_length(password) {
            return Err(AuthError::WeakPassword(message));
        }
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let _guard = self.write_gate.lock().await;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let now = self.clock.now();
        let user = self
            .users
            .put(User {
                id: Uuid::new_v4(),
                email,
                display_name: display_name.trim().to_string(),
                password_hash,
                driver_available: false,
                driver_info: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(user)
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue(user)
    }

    fn issue(&self, user: User) -> Result<AuthResult, AuthError> {
        let token = self.jwt.issue_access_token(user.id)?;
        Ok(AuthResult {
            user,
            access_token: token.token,
            expires_in: token.expires_in,
        })
    }
}
