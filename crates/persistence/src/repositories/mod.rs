//! PostgreSQL implementations of the domain store traits.

pub mod carpool;
pub mod message;
pub mod user;

pub use carpool::CarpoolRepository;
pub use message::MessageRepository;
pub use user::UserRepository;

use domain::store::StoreError;

pub(crate) fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database query failed");
    StoreError::Backend(err.to_string())
}
