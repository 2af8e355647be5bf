//! Current user profile route.

use axum::{extract::State, Json};
use domain::models::user::UserResponse;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .stores
        .users
        .get(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}
