//! Carpool chat message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A chat post inside a carpool thread. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarpoolMessage {
    pub id: Uuid,
    pub carpool_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for posting a chat message.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

/// Response for GET /api/v1/carpools/:id/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub messages: Vec<CarpoolMessage>,
}
