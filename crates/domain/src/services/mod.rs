//! Domain services for Campus Carpool.
//!
//! Services contain the business rules that operate on domain models. They
//! are synchronous and storage-free; "now" and "today" are passed in.

pub mod carpool_lifecycle;
pub mod chat;
pub mod driver_policy;
pub mod feed;
pub mod notification;

pub use carpool_lifecycle::{CarpoolLimits, Transition};
pub use notification::{
    LicenseExpirationPayload, MockNotificationService, NotificationResult, NotificationService,
    NotificationType,
};
