//! Carpool thread domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Status Enum
// ============================================================================

/// Lifecycle status of a carpool thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarpoolStatus {
    Draft,
    Open,
    PendingConfirmations,
    Confirmed,
    Canceled,
    Expired,
    Completed,
}

impl CarpoolStatus {
    pub const ALL: [CarpoolStatus; 7] = [
        CarpoolStatus::Draft,
        CarpoolStatus::Open,
        CarpoolStatus::PendingConfirmations,
        CarpoolStatus::Confirmed,
        CarpoolStatus::Canceled,
        CarpoolStatus::Expired,
        CarpoolStatus::Completed,
    ];

    /// Returns the string representation used in storage and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarpoolStatus::Draft => "DRAFT",
            CarpoolStatus::Open => "OPEN",
            CarpoolStatus::PendingConfirmations => "PENDING_CONFIRMATIONS",
            CarpoolStatus::Confirmed => "CONFIRMED",
            CarpoolStatus::Canceled => "CANCELED",
            CarpoolStatus::Expired => "EXPIRED",
            CarpoolStatus::Completed => "COMPLETED",
        }
    }

    /// Statuses in which membership and confirmations may still change.
    pub fn accepts_membership_changes(&self) -> bool {
        matches!(
            self,
            CarpoolStatus::Draft | CarpoolStatus::Open | CarpoolStatus::PendingConfirmations
        )
    }
}

impl fmt::Display for CarpoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CarpoolStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarpoolStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid carpool status: {}. Must be one of: DRAFT, OPEN, \
                     PENDING_CONFIRMATIONS, CONFIRMED, CANCELED, EXPIRED, COMPLETED",
                    s
                )
            })
    }
}

// ============================================================================
// Core Model
// ============================================================================

/// Local wall-clock departure window, `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

/// One member of a carpool thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarpoolParticipant {
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub is_creator: bool,
}

impl CarpoolParticipant {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

/// One planned shared ride and its participants.
///
/// `interested_count` and `confirmed_count` are projections of
/// `participants`; only `carpool_lifecycle::recompute` writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarpoolThread {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub destination: String,
    pub date: NaiveDate,
    pub time_window: TimeWindow,
    pub pickup_area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub seats_needed: i32,
    pub target_group_size: i32,
    pub participants: Vec<CarpoolParticipant>,
    pub interested_count: i32,
    pub confirmed_count: i32,
    pub status: CarpoolStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
}

impl CarpoolThread {
    pub fn participant(&self, user_id: Uuid) -> Option<&CarpoolParticipant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participant(user_id).is_some()
    }

    pub fn is_creator(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Time window as submitted; both ends optional so that a missing value is
/// reported as a validation error rather than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeWindowInput {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Request payload for creating a carpool thread.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCarpool {
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time_window: Option<TimeWindowInput>,
    pub pickup_area: Option<String>,
    pub seats_needed: Option<i32>,
    pub notes: Option<String>,
    /// Initial status override; only DRAFT and OPEN are accepted.
    pub status: Option<CarpoolStatus>,
}

/// Feed query string: `?status=OPEN,PENDING_CONFIRMATIONS&destination=air&date=2025-05-01`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCarpoolsQuery {
    pub status: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

/// Feed filter criteria. Unset criteria match everything; set criteria are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarpoolFilter {
    /// Accepted statuses; empty means any.
    pub statuses: Vec<CarpoolStatus>,
    /// Case-insensitive substring of the destination.
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

impl CarpoolFilter {
    pub fn matches(&self, thread: &CarpoolThread) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&thread.status) {
            return false;
        }
        if let Some(needle) = &self.destination {
            if !thread
                .destination
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(date) = self.date {
            if thread.date != date {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response for GET /api/v1/carpools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCarpoolsResponse {
    pub carpools: Vec<CarpoolThread>,
    pub total: usize,
}
