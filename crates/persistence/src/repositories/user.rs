//! User repository.

use async_trait::async_trait;
use domain::models::User;
use domain::store::{StoreResult, UserStore};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::backend;
use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get(&self, id: Uuid) -> StoreResult<Option<User>> {
        let timer = QueryTimer::new("get_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, password_hash, driver_available, driver_info,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(backend)?.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, password_hash, driver_available, driver_info,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(backend)?.map(User::from))
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let timer = QueryTimer::new("list_users");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, password_hash, driver_available, driver_info,
                   created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(backend)?.into_iter().map(User::from).collect())
    }

    async fn put(&self, user: User) -> StoreResult<User> {
        let timer = QueryTimer::new("put_user");
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, display_name, password_hash, driver_available, driver_info,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                password_hash = EXCLUDED.password_hash,
                driver_available = EXCLUDED.driver_available,
                driver_info = EXCLUDED.driver_info,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.driver_available)
        .bind(user.driver_info.as_ref().map(Json))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;
        timer.record();

        result.map_err(backend)?;
        Ok(user)
    }
}
