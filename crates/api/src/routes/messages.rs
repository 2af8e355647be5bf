//! Carpool chat routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::message::{ListMessagesResponse, PostMessageRequest};
use domain::models::CarpoolMessage;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::CarpoolService;

/// GET /api/v1/carpools/:carpool_id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(carpool_id): Path<Uuid>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
    let messages = CarpoolService::from_state(&state)
        .list_messages(carpool_id)
        .await?;
    Ok(Json(ListMessagesResponse { messages }))
}

/// POST /api/v1/carpools/:carpool_id/messages
pub async fn post_message(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(carpool_id): Path<Uuid>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<CarpoolMessage>), ApiError> {
    request.validate()?;

    let message = CarpoolService::from_state(&state)
        .post_message(carpool_id, auth.user_id, &request.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
