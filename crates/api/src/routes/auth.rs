//! Registration and login routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::UserResponse;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthResult, AuthService};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Length bounds are enforced by the auth service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Body of both register and login responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            user: UserResponse::from(&result.user),
            tokens: TokensResponse {
                access_token: result.access_token,
                token_type: "Bearer".to_string(),
                expires_in: result.expires_in,
            },
        }
    }
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.stores.users.clone(),
        state.jwt.clone(),
        state.clock.clone(),
        state.write_gate.clone(),
    )
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let result = auth_service(&state)
        .register(&request.email, &request.password, &request.display_name)
        .await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let result = auth_service(&state)
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(result.into()))
}
