//! Domain models for Campus Carpool.

pub mod carpool;
pub mod driver;
pub mod message;
pub mod user;

pub use carpool::{
    CarpoolFilter, CarpoolParticipant, CarpoolStatus, CarpoolThread, NewCarpool, TimeWindow,
};
pub use driver::{AlertWindow, AlertsNeeded, DriverInfo, ExpirationAlertsSent, ExpirationStatus};
pub use message::CarpoolMessage;
pub use user::User;
