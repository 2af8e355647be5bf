//! Chat message repository.

use async_trait::async_trait;
use domain::models::CarpoolMessage;
use domain::store::{MessageStore, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::backend;
use crate::entities::CarpoolMessageEntity;
use crate::metrics::QueryTimer;

/// Repository for carpool chat messages.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn list_for_carpool(&self, carpool_id: Uuid) -> StoreResult<Vec<CarpoolMessage>> {
        let timer = QueryTimer::new("list_carpool_messages");
        let result = sqlx::query_as::<_, CarpoolMessageEntity>(
            r#"
            SELECT id, carpool_id, user_id, content, created_at
            FROM carpool_messages
            WHERE carpool_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(carpool_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(backend)?
            .into_iter()
            .map(CarpoolMessage::from)
            .collect())
    }

    async fn put(&self, message: CarpoolMessage) -> StoreResult<CarpoolMessage> {
        let timer = QueryTimer::new("insert_carpool_message");
        let result = sqlx::query(
            r#"
            INSERT INTO carpool_messages (id, carpool_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(message.id)
        .bind(message.carpool_id)
        .bind(message.user_id)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await;
        timer.record();

        result.map_err(backend)?;
        Ok(message)
    }
}
