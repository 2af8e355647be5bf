//! Chat message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::CarpoolMessage;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the carpool_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct CarpoolMessageEntity {
    pub id: Uuid,
    pub carpool_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CarpoolMessageEntity> for CarpoolMessage {
    fn from(entity: CarpoolMessageEntity) -> Self {
        Self {
            id: entity.id,
            carpool_id: entity.carpool_id,
            user_id: entity.user_id,
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}
