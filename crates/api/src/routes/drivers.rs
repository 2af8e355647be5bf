//! Driver capability routes for the current user.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::driver::{DriverStatusResponse, LicenseInput, SetAvailabilityRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::DriverService;

/// GET /api/v1/users/me/driver
pub async fn get_driver(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<DriverStatusResponse>, ApiError> {
    let status = DriverService::from_state(&state).status(auth.user_id).await?;
    Ok(Json(status))
}

/// POST /api/v1/users/me/driver
pub async fn enable_driver(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<LicenseInput>,
) -> Result<(StatusCode, Json<DriverStatusResponse>), ApiError> {
    let status = DriverService::from_state(&state)
        .enable(auth.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// PUT /api/v1/users/me/driver
pub async fn update_driver(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<LicenseInput>,
) -> Result<Json<DriverStatusResponse>, ApiError> {
    let status = DriverService::from_state(&state)
        .update(auth.user_id, &request)
        .await?;
    Ok(Json(status))
}

/// POST /api/v1/users/me/driver/verify
pub async fn verify_driver(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<DriverStatusResponse>, ApiError> {
    let status = DriverService::from_state(&state).verify(auth.user_id).await?;
    Ok(Json(status))
}

/// PUT /api/v1/users/me/availability
pub async fn set_availability(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<Json<DriverStatusResponse>, ApiError> {
    let status = DriverService::from_state(&state)
        .set_availability(auth.user_id, request.available)
        .await?;
    Ok(Json(status))
}
