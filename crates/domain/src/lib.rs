//! Domain layer for the Campus Carpool backend.
//!
//! This crate contains:
//! - Records and request/response DTOs (carpools, chat, users, driver licenses)
//! - The carpool lifecycle and driver license rule engines
//! - Store traits implemented by the persistence crate
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::DomainError;
