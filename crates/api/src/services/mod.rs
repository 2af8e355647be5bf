//! Application services.
//!
//! Each service loads whole records from the stores, runs a domain rule and
//! writes the whole record back. Mutations hold the shared write gate for
//! the full load → rule → put sequence.

pub mod auth;
pub mod carpool;
pub mod driver;

pub use auth::{AuthError, AuthResult, AuthService};
pub use carpool::{CarpoolAction, CarpoolService};
pub use driver::DriverService;
