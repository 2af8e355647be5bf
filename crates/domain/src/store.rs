//! Store traits.
//!
//! The rule engines never touch storage. Application services load a whole
//! record through these traits, run a rule, and hand the whole record back
//! with `put`; there are no partial updates.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CarpoolMessage, CarpoolThread, User};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed (connection, query, constraint).
    #[error("backend failure: {0}")]
    Backend(String),

    /// A stored row could not be mapped back onto a record.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Carpool thread storage, keyed by thread id.
#[async_trait]
pub trait CarpoolStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<CarpoolThread>>;

    /// All threads, oldest first.
    async fn list(&self) -> StoreResult<Vec<CarpoolThread>>;

    /// Inserts or replaces the whole thread.
    async fn put(&self, thread: CarpoolThread) -> StoreResult<CarpoolThread>;
}

/// Chat message storage. Messages are immutable once stored.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages of one thread ordered by `created_at` ascending.
    async fn list_for_carpool(&self, carpool_id: Uuid) -> StoreResult<Vec<CarpoolMessage>>;

    async fn put(&self, message: CarpoolMessage) -> StoreResult<CarpoolMessage>;
}

/// User account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Lookup by normalized (lowercase) email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Inserts or replaces the whole user record.
    async fn put(&self, user: User) -> StoreResult<User>;
}
