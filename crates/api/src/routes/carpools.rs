//! Carpool thread routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::carpool::{ListCarpoolsQuery, ListCarpoolsResponse};
use domain::models::{CarpoolThread, NewCarpool};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::{CarpoolAction, CarpoolService};

/// POST /api/v1/carpools
pub async fn create_carpool(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<NewCarpool>,
) -> Result<(StatusCode, Json<CarpoolThread>), ApiError> {
    let thread = CarpoolService::from_state(&state)
        .create(auth.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

/// GET /api/v1/carpools
///
/// Query: `status` (comma list), `destination` (substring), `date` (YYYY-MM-DD).
pub async fn list_carpools(
    State(state): State<AppState>,
    Query(query): Query<ListCarpoolsQuery>,
) -> Result<Json<ListCarpoolsResponse>, ApiError> {
    let carpools = CarpoolService::from_state(&state).list(&query).await?;
    Ok(Json(ListCarpoolsResponse {
        total: carpools.len(),
        carpools,
    }))
}

/// GET /api/v1/carpools/:carpool_id
pub async fn get_carpool(
    State(state): State<AppState>,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<CarpoolThread>, ApiError> {
    let thread = CarpoolService::from_state(&state).get(carpool_id).await?;
    Ok(Json(thread))
}

async fn act(
    state: &AppState,
    carpool_id: Uuid,
    auth: &UserAuth,
    action: CarpoolAction,
) -> Result<Json<CarpoolThread>, ApiError> {
    let thread = CarpoolService::from_state(state)
        .apply(carpool_id, auth.user_id, action)
        .await?;
    Ok(Json(thread))
}

/// POST /api/v1/carpools/:carpool_id/join
pub async fn join_carpool(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<CarpoolThread>, ApiError> {
    act(&state, carpool_id, &auth, CarpoolAction::Join).await
}

/// POST /api/v1/carpools/:carpool_id/confirm
pub async fn confirm_carpool(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<CarpoolThread>, ApiError> {
    act(&state, carpool_id, &auth, CarpoolAction::Confirm).await
}

/// POST /api/v1/carpools/:carpool_id/unconfirm
pub async fn unconfirm_carpool(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<CarpoolThread>, ApiError> {
    act(&state, carpool_id, &auth, CarpoolAction::Unconfirm).await
}

/// POST /api/v1/carpools/:carpool_id/lock
pub async fn lock_carpool(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<CarpoolThread>, ApiError> {
    act(&state, carpool_id, &auth, CarpoolAction::Lock).await
}

/// POST /api/v1/carpools/:carpool_id/cancel
pub async fn cancel_carpool(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<CarpoolThread>, ApiError> {
    act(&state, carpool_id, &auth, CarpoolAction::Cancel).await
}
