//! Shared utilities for the Campus Carpool backend.
//!
//! - Clock capability (injected "now" / "today")
//! - JWT access tokens
//! - Argon2id password hashing
//! - Field validators used by request DTOs and the rule engines

pub mod clock;
pub mod jwt;
pub mod password;
pub mod validation;
