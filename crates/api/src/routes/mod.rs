//! HTTP route handlers.

pub mod auth;
pub mod carpools;
pub mod drivers;
pub mod health;
pub mod messages;
pub mod users;
