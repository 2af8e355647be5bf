//! Carpool thread repository.

use async_trait::async_trait;
use domain::models::CarpoolThread;
use domain::store::{CarpoolStore, StoreResult};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::backend;
use crate::entities::CarpoolEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = r#"
    id, creator_id, destination, date, time_window_start, time_window_end, pickup_area,
    notes, seats_needed, target_group_size, participants, interested_count, confirmed_count,
    status, created_at, updated_at, locked_at, canceled_at
"#;

/// Repository for carpool thread rows.
#[derive(Clone)]
pub struct CarpoolRepository {
    pool: PgPool,
}

impl CarpoolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarpoolStore for CarpoolRepository {
    async fn get(&self, id: Uuid) -> StoreResult<Option<CarpoolThread>> {
        let timer = QueryTimer::new("get_carpool");
        let result = sqlx::query_as::<_, CarpoolEntity>(&format!(
            "SELECT {COLUMNS} FROM carpool_threads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map_err(backend)?
            .map(CarpoolEntity::into_domain)
            .transpose()
    }

    async fn list(&self) -> StoreResult<Vec<CarpoolThread>> {
        let timer = QueryTimer::new("list_carpools");
        let result = sqlx::query_as::<_, CarpoolEntity>(&format!(
            "SELECT {COLUMNS} FROM carpool_threads ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result
            .map_err(backend)?
            .into_iter()
            .map(CarpoolEntity::into_domain)
            .collect()
    }

    async fn put(&self, thread: CarpoolThread) -> StoreResult<CarpoolThread> {
        let timer = QueryTimer::new("put_carpool");
        let result = sqlx::query(
            r#"
            INSERT INTO carpool_threads (
                id, creator_id, destination, date, time_window_start, time_window_end,
                pickup_area, notes, seats_needed, target_group_size, participants,
                interested_count, confirmed_count, status, created_at, updated_at,
                locked_at, canceled_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (id) DO UPDATE SET
                destination = EXCLUDED.destination,
                date = EXCLUDED.date,
                time_window_start = EXCLUDED.time_window_start,
                time_window_end = EXCLUDED.time_window_end,
                pickup_area = EXCLUDED.pickup_area,
                notes = EXCLUDED.notes,
                seats_needed = EXCLUDED.seats_needed,
                target_group_size = EXCLUDED.target_group_size,
                participants = EXCLUDED.participants,
                interested_count = EXCLUDED.interested_count,
                confirmed_count = EXCLUDED.confirmed_count,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at,
                locked_at = EXCLUDED.locked_at,
                canceled_at = EXCLUDED.canceled_at
            "#,
        )
        .bind(thread.id)
        .bind(thread.creator_id)
        .bind(&thread.destination)
        .bind(thread.date)
        .bind(&thread.time_window.start)
        .bind(&thread.time_window.end)
        .bind(&thread.pickup_area)
        .bind(&thread.notes)
        .bind(thread.seats_needed)
        .bind(thread.target_group_size)
        .bind(Json(&thread.participants))
        .bind(thread.interested_count)
        .bind(thread.confirmed_count)
        .bind(thread.status.as_str())
        .bind(thread.created_at)
        .bind(thread.updated_at)
        .bind(thread.locked_at)
        .bind(thread.canceled_at)
        .execute(&self.pool)
        .await;
        timer.record();

        result.map_err(backend)?;
        Ok(thread)
    }
}
