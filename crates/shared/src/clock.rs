//! Clock capability.
//!
//! Rule engines never read the wall clock themselves; handlers and jobs pass
//! in the instant obtained from a [`Clock`] so that lifecycle timestamps and
//! license expiration checks are deterministic under test.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Arc, RwLock};

/// Source of the current instant and calendar date.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date. Day-granularity comparisons use this value.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and simulations.
///
/// Cloned handles share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    /// Clock pinned to midday UTC of the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or_else(Utc::now);
        Self::new(noon)
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.instant.write() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_reports_instant() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 14, 8, 30, 0).unwrap();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_fixed_clock_advance_is_shared_between_clones() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        let other = clock.clone();
        clock.advance(Duration::days(1));
        assert_eq!(other.today(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }

    #[test]
    fn test_fixed_clock_set() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let later = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_system_clock_today_matches_now() {
        let clock = SystemClock;
        let today = clock.today();
        assert!(clock.now().date_naive() >= today);
    }
}
