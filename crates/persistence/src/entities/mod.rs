//! Database entity definitions.

pub mod carpool;
pub mod message;
pub mod user;

pub use carpool::CarpoolEntity;
pub use message::CarpoolMessageEntity;
pub use user::UserEntity;
