//! Background job scheduler and job implementations.

mod license_alerts;
mod pool_metrics;
mod scheduler;

pub use license_alerts::{AlertRunSummary, LicenseExpirationAlertJob};
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
