//! Carpool thread entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{CarpoolParticipant, CarpoolStatus, CarpoolThread, TimeWindow};
use domain::store::StoreError;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the carpool_threads table.
#[derive(Debug, Clone, FromRow)]
pub struct CarpoolEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub destination: String,
    pub date: NaiveDate,
    pub time_window_start: String,
    pub time_window_end: String,
    pub pickup_area: String,
    pub notes: Option<String>,
    pub seats_needed: i32,
    pub target_group_size: i32,
    pub participants: Json<Vec<CarpoolParticipant>>,
    pub interested_count: i32,
    pub confirmed_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub locked_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl CarpoolEntity {
    /// Converts the row into a domain record; an unknown status is corruption.
    pub fn into_domain(self) -> Result<CarpoolThread, StoreError> {
        let status: CarpoolStatus = self
            .status
            .parse()
            .map_err(|e: String| StoreError::Corrupt(format!("carpool {}: {}", self.id, e)))?;

        Ok(CarpoolThread {
            id: self.id,
            creator_id: self.creator_id,
            destination: self.destination,
            date: self.date,
            time_window: TimeWindow {
                start: self.time_window_start,
                end: self.time_window_end,
            },
            pickup_area: self.pickup_area,
            notes: self.notes,
            seats_needed: self.seats_needed,
            target_group_size: self.target_group_size,
            participants: self.participants.0,
            interested_count: self.interested_count,
            confirmed_count: self.confirmed_count,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            locked_at: self.locked_at,
            canceled_at: self.canceled_at,
        })
    }
}
