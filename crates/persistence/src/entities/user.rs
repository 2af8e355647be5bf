//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{DriverInfo, User};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub driver_available: bool,
    pub driver_info: Option<Json<DriverInfo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            password_hash: entity.password_hash,
            driver_available: entity.driver_available,
            driver_info: entity.driver_info.map(|info| info.0),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
