//! Carpool feed assembly.
//!
//! Threads past their date are reported as `EXPIRED` even though the
//! lifecycle engine never writes that status; the projection is applied
//! before filtering so `status=EXPIRED` works.

use chrono::NaiveDate;

use super::carpool_lifecycle::{filter, sort_by_soonest};
use crate::error::DomainError;
use crate::models::carpool::{CarpoolFilter, CarpoolStatus, CarpoolThread, ListCarpoolsQuery};
use shared::validation::parse_calendar_date;

/// Statuses shown when the caller does not ask for specific ones.
pub const DEFAULT_FEED_STATUSES: [CarpoolStatus; 4] = [
    CarpoolStatus::Draft,
    CarpoolStatus::Open,
    CarpoolStatus::PendingConfirmations,
    CarpoolStatus::Confirmed,
];

/// Reports a still-forming thread whose date has passed as `EXPIRED`.
pub fn project_expiry(mut thread: CarpoolThread, today: NaiveDate) -> CarpoolThread {
    if thread.status.accepts_membership_changes() && thread.date < today {
        thread.status = CarpoolStatus::Expired;
    }
    thread
}

/// Parses the feed query string into filter criteria.
pub fn parse_query(query: &ListCarpoolsQuery) -> Result<CarpoolFilter, DomainError> {
    let statuses = match query.status.as_deref() {
        None => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.to_ascii_uppercase()
                    .parse::<CarpoolStatus>()
                    .map_err(|message| DomainError::validation("status", message))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    let destination = query
        .destination
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_calendar_date(raw).map_err(|e| DomainError::from_field("date", e))?),
    };

    Ok(CarpoolFilter {
        statuses,
        destination,
        date,
    })
}

/// Projects expiry, applies the filter (default statuses when none were
/// requested) and sorts soonest first.
pub fn assemble(
    threads: Vec<CarpoolThread>,
    criteria: &CarpoolFilter,
    today: NaiveDate,
) -> Vec<CarpoolThread> {
    let projected = threads
        .into_iter()
        .map(|thread| project_expiry(thread, today))
        .collect();

    let filtered = if criteria.statuses.is_empty() {
        let defaults = CarpoolFilter {
            statuses: DEFAULT_FEED_STATUSES.to_vec(),
            ..criteria.clone()
        };
        filter(projected, &defaults)
    } else {
        filter(projected, criteria)
    };

    sort_by_soonest(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::carpool::{CarpoolParticipant, TimeWindow};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    fn thread(date: NaiveDate, start: &str, status: CarpoolStatus) -> CarpoolThread {
        let creator = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        CarpoolThread {
            id: Uuid::new_v4(),
            creator_id: creator,
            destination: "Airport".to_string(),
            date,
            time_window: TimeWindow {
                start: start.to_string(),
                end: "23:00".to_string(),
            },
            pickup_area: "Library".to_string(),
            notes: None,
            seats_needed: 1,
            target_group_size: 2,
            participants: vec![CarpoolParticipant {
                user_id: creator,
                joined_at: at,
                confirmed_at: Some(at),
                is_creator: true,
            }],
            interested_count: 1,
            confirmed_count: 1,
            status,
            created_at: at,
            updated_at: at,
            locked_at: None,
            canceled_at: None,
        }
    }

    fn yesterday() -> NaiveDate {
        today().pred_opt().unwrap()
    }

    #[test]
    fn test_project_expiry() {
        let past_open = project_expiry(thread(yesterday(), "08:00", CarpoolStatus::Open), today());
        assert_eq!(past_open.status, CarpoolStatus::Expired);

        let today_open = project_expiry(thread(today(), "08:00", CarpoolStatus::Open), today());
        assert_eq!(today_open.status, CarpoolStatus::Open);

        let past_locked =
            project_expiry(thread(yesterday(), "08:00", CarpoolStatus::Confirmed), today());
        assert_eq!(past_locked.status, CarpoolStatus::Confirmed);

        let past_canceled =
            project_expiry(thread(yesterday(), "08:00", CarpoolStatus::Canceled), today());
        assert_eq!(past_canceled.status, CarpoolStatus::Canceled);
    }

    #[test]
    fn test_parse_query() {
        let filter = parse_query(&ListCarpoolsQuery {
            status: Some("open, pending_confirmations".to_string()),
            destination: Some("  air ".to_string()),
            date: Some("2025-05-12".to_string()),
        })
        .unwrap();
        assert_eq!(
            filter.statuses,
            vec![CarpoolStatus::Open, CarpoolStatus::PendingConfirmations]
        );
        assert_eq!(filter.destination.as_deref(), Some("air"));
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2025, 5, 12));
    }

    #[test]
    fn test_parse_query_empty() {
        let filter = parse_query(&ListCarpoolsQuery {
            status: Some(String::new()),
            destination: Some("  ".to_string()),
            date: Some(String::new()),
        })
        .unwrap();
        assert_eq!(filter, CarpoolFilter::default());
    }

    #[test]
    fn test_parse_query_rejects_unknown_status() {
        let err = parse_query(&ListCarpoolsQuery {
            status: Some("OPEN,FULL".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_parse_query_rejects_bad_date() {
        let err = parse_query(&ListCarpoolsQuery {
            date: Some("tomorrow".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "date"));
    }

    #[test]
    fn test_assemble_default_hides_finished_threads() {
        let next_week = today() + chrono::Duration::days(7);
        let threads = vec![
            thread(next_week, "09:00", CarpoolStatus::Open),
            thread(yesterday(), "08:00", CarpoolStatus::Open),
            thread(next_week, "07:00", CarpoolStatus::Canceled),
            thread(today(), "18:00", CarpoolStatus::Confirmed),
        ];

        let feed = assemble(threads, &CarpoolFilter::default(), today());
        let statuses: Vec<_> = feed.iter().map(|t| t.status).collect();
        assert_eq!(statuses, vec![CarpoolStatus::Confirmed, CarpoolStatus::Open]);
    }

    #[test]
    fn test_assemble_expired_filter() {
        let threads = vec![
            thread(yesterday(), "08:00", CarpoolStatus::PendingConfirmations),
            thread(today(), "08:00", CarpoolStatus::Open),
        ];
        let criteria = CarpoolFilter {
            statuses: vec![CarpoolStatus::Expired],
            ..Default::default()
        };
        let feed = assemble(threads, &criteria, today());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].date, yesterday());
    }

    #[test]
    fn test_assemble_keeps_other_criteria_with_default_statuses() {
        let mut downtown = thread(today(), "08:00", CarpoolStatus::Open);
        downtown.destination = "Downtown".to_string();
        let threads = vec![downtown, thread(today(), "09:00", CarpoolStatus::Open)];
        let criteria = CarpoolFilter {
            destination: Some("down".to_string()),
            ..Default::default()
        };
        let feed = assemble(threads, &criteria, today());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].destination, "Downtown");
    }
}
