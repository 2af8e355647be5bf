//! User JWT authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use shared::jwt::{JwtConfig, JwtError};

/// Authenticated caller, inserted into request extensions.
///
/// Handlers trust `user_id` completely; no further identity checks happen
/// downstream.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) of the presented token.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt_config.validate_access_token(token)?;
        Ok(UserAuth {
            user_id: claims.user_id()?,
            jti: claims.jti,
        })
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(req_headers: &axum::http::HeaderMap) -> Option<&str> {
    req_headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires JWT user authentication.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            .into_response();
    };

    match UserAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            tracing::debug!(user_id = %auth.user_id, "Request authenticated");
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "JWT validation failed");
            ApiError::Unauthorized("Invalid or expired token".to_string()).into_response()
        }
    }
}
