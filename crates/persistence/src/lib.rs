//! Persistence layer for the Campus Carpool backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - PostgreSQL repositories implementing the domain store traits
//! - An in-memory store used when no database is configured

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod repositories;

pub use memory::InMemoryStore;
