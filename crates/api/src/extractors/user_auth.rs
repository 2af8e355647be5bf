//! Authenticated caller extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::{bearer_token, UserAuth as UserAuthData};

/// The caller's identity, taken from the `require_user_auth` middleware or,
/// on routes without it, from the bearer token directly.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub jti: String,
}

impl From<UserAuthData> for UserAuth {
    fn from(data: UserAuthData) -> Self {
        Self {
            user_id: data.user_id,
            jti: data.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(auth.clone().into());
        }

        let token = bearer_token(&parts.headers).ok_or_else(|| {
            ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

        UserAuthData::validate(&state.jwt, token)
            .map(Into::into)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}
