//! Carpool lifecycle state machine.
//!
//! ```text
//!            join (confirmed > 0)         lock (creator)
//!   OPEN ─────────────────────────► PENDING_CONFIRMATIONS ─────────► CONFIRMED
//!    ▲  ◄───────────────────────────         │  ▲                        │
//!    │     unconfirm (confirmed = 0)         │  └ confirm / unconfirm    │
//!    └──────────────── lock (creator) ───────┼───────────────────────────┘
//!                                            ▼
//!        any status ── cancel (creator) ──► CANCELED
//! ```
//!
//! Every operation takes the thread by value and returns it, so a failed
//! call leaves the caller's stored copy untouched. Counters are always
//! rebuilt by [`recompute`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::carpool::{
    CarpoolFilter, CarpoolParticipant, CarpoolStatus, CarpoolThread, NewCarpool, TimeWindow,
};
use shared::validation::{
    parse_calendar_date, validate_max_chars, validate_not_blank, validate_time_of_day,
};

/// Maximum length of the free-text notes, in characters.
pub const MAX_NOTES_CHARS: usize = 1000;

/// Creation limits supplied by configuration.
#[derive(Debug, Clone, Copy)]
pub struct CarpoolLimits {
    pub max_seats_needed: i32,
}

impl Default for CarpoolLimits {
    fn default() -> Self {
        Self {
            max_seats_needed: 7,
        }
    }
}

/// Result of a mutating operation.
#[derive(Debug, Clone)]
pub struct Transition {
    pub thread: CarpoolThread,
    /// `false` when the operation was a no-op and nothing needs storing.
    pub changed: bool,
}

impl Transition {
    fn changed(thread: CarpoolThread) -> Self {
        Self {
            thread,
            changed: true,
        }
    }

    fn unchanged(thread: CarpoolThread) -> Self {
        Self {
            thread,
            changed: false,
        }
    }
}

/// Rebuilds the denormalized counters from the participant set.
pub fn recompute(mut thread: CarpoolThread) -> CarpoolThread {
    thread.interested_count = thread.participants.len() as i32;
    thread.confirmed_count = thread
        .participants
        .iter()
        .filter(|p| p.is_confirmed())
        .count() as i32;
    thread
}

fn required(value: Option<String>, field: &str) -> Result<String, DomainError> {
    let value = value.unwrap_or_default();
    validate_not_blank(&value, field).map_err(|e| DomainError::from_field(field, e))?;
    Ok(value.trim().to_string())
}

fn required_time(value: Option<String>, field: &str) -> Result<String, DomainError> {
    let value = required(value, field)?;
    validate_time_of_day(&value).map_err(|e| DomainError::from_field(field, e))?;
    Ok(value)
}

/// Creates a thread with the creator joined and confirmed.
///
/// Fields are checked in order (destination, date, time window, pickup
/// area, seats, notes, status) and the first failure is returned.
pub fn create(
    creator_id: Uuid,
    input: NewCarpool,
    limits: &CarpoolLimits,
    now: DateTime<Utc>,
) -> Result<CarpoolThread, DomainError> {
    let destination = required(input.destination, "destination")?;

    let date_raw = required(input.date, "date")?;
    let date = parse_calendar_date(&date_raw).map_err(|e| DomainError::from_field("date", e))?;

    let window = input.time_window.unwrap_or_default();
    let start = required_time(window.start, "timeWindow.start")?;
    let end = required_time(window.end, "timeWindow.end")?;

    let pickup_area = required(input.pickup_area, "pickupArea")?;

    let seats_needed = input
        .seats_needed
        .ok_or_else(|| DomainError::validation("seatsNeeded", "seatsNeeded is required"))?;
    if seats_needed < 1 {
        return Err(DomainError::validation(
            "seatsNeeded",
            "seatsNeeded must be at least 1",
        ));
    }
    if seats_needed > limits.max_seats_needed {
        return Err(DomainError::validation(
            "seatsNeeded",
            format!("seatsNeeded must be at most {}", limits.max_seats_needed),
        ));
    }

    let notes = input
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if let Some(notes) = &notes {
        validate_max_chars(notes, MAX_NOTES_CHARS, "notes")
            .map_err(|e| DomainError::from_field("notes", e))?;
    }

    let status = match input.status {
        None => CarpoolStatus::Open,
        Some(status @ (CarpoolStatus::Draft | CarpoolStatus::Open)) => status,
        Some(other) => {
            return Err(DomainError::validation(
                "status",
                format!("a carpool cannot be created in status {}", other),
            ))
        }
    };

    let thread = CarpoolThread {
        id: Uuid::new_v4(),
        creator_id,
        destination,
        date,
        time_window: TimeWindow { start, end },
        pickup_area,
        notes,
        seats_needed,
        target_group_size: seats_needed + 1,
        participants: vec![CarpoolParticipant {
            user_id: creator_id,
            joined_at: now,
            confirmed_at: Some(now),
            is_creator: true,
        }],
        interested_count: 0,
        confirmed_count: 0,
        status,
        created_at: now,
        updated_at: now,
        locked_at: None,
        canceled_at: None,
    };

    Ok(recompute(thread))
}

fn ensure_membership_open(thread: &CarpoolThread) -> Result<(), DomainError> {
    if thread.status.accepts_membership_changes() {
        Ok(())
    } else {
        Err(DomainError::Policy(format!(
            "carpool is {} and no longer accepts changes",
            thread.status
        )))
    }
}

/// Adds `user_id` as an unconfirmed participant. Joining twice is a no-op.
pub fn join(
    thread: CarpoolThread,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    if thread.is_participant(user_id) {
        return Ok(Transition::unchanged(thread));
    }
    ensure_membership_open(&thread)?;

    let mut thread = thread;
    thread.participants.push(CarpoolParticipant {
        user_id,
        joined_at: now,
        confirmed_at: None,
        is_creator: false,
    });
    let mut thread = recompute(thread);

    // The joiner is never confirmed; this looks at the existing confirmations.
    if thread.status == CarpoolStatus::Open && thread.confirmed_count > 0 {
        thread.status = CarpoolStatus::PendingConfirmations;
    }
    thread.updated_at = now;

    Ok(Transition::changed(thread))
}

/// Confirms an existing participant. Reaching the target size never locks.
pub fn confirm(
    thread: CarpoolThread,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    let index = thread
        .participants
        .iter()
        .position(|p| p.user_id == user_id)
        .ok_or_else(|| DomainError::NotFound("Participant".to_string()))?;

    if thread.participants[index].is_confirmed() {
        return Ok(Transition::unchanged(thread));
    }
    ensure_membership_open(&thread)?;

    let mut thread = thread;
    thread.participants[index].confirmed_at = Some(now);
    let mut thread = recompute(thread);

    if thread.confirmed_count > 0 {
        thread.status = CarpoolStatus::PendingConfirmations;
    }
    thread.updated_at = now;

    Ok(Transition::changed(thread))
}

/// Withdraws a participant's confirmation.
///
/// No-op for unknown users, unconfirmed participants, the creator, and
/// threads that are locked or finished.
pub fn unconfirm(
    thread: CarpoolThread,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    let Some(index) = thread
        .participants
        .iter()
        .position(|p| p.user_id == user_id)
    else {
        return Ok(Transition::unchanged(thread));
    };

    let participant = &thread.participants[index];
    if !participant.is_confirmed()
        || participant.is_creator
        || !thread.status.accepts_membership_changes()
    {
        return Ok(Transition::unchanged(thread));
    }

    let mut thread = thread;
    thread.participants[index].confirmed_at = None;
    let mut thread = recompute(thread);

    thread.status = if thread.confirmed_count == 0 {
        CarpoolStatus::Open
    } else {
        CarpoolStatus::PendingConfirmations
    };
    thread.updated_at = now;

    Ok(Transition::changed(thread))
}

/// Freezes the thread into `CONFIRMED`. Creator only, from `OPEN` or
/// `PENDING_CONFIRMATIONS`; no confirmation threshold applies.
pub fn lock(
    thread: CarpoolThread,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    if !thread.is_creator(actor_id) {
        return Err(DomainError::Forbidden(
            "Only the creator can lock this carpool".to_string(),
        ));
    }
    if !matches!(
        thread.status,
        CarpoolStatus::Open | CarpoolStatus::PendingConfirmations
    ) {
        return Err(DomainError::Policy(format!(
            "cannot lock a carpool in status {}",
            thread.status
        )));
    }

    let mut thread = thread;
    thread.status = CarpoolStatus::Confirmed;
    thread.locked_at = Some(now);
    thread.updated_at = now;

    Ok(Transition::changed(thread))
}

/// Cancels the thread from any status. Creator only.
pub fn cancel(
    thread: CarpoolThread,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Transition, DomainError> {
    if !thread.is_creator(actor_id) {
        return Err(DomainError::Forbidden(
            "Only the creator can cancel this carpool".to_string(),
        ));
    }

    let mut thread = thread;
    thread.status = CarpoolStatus::Canceled;
    thread.canceled_at = Some(now);
    thread.updated_at = now;

    Ok(Transition::changed(thread))
}

/// Keeps the threads matching every provided criterion.
pub fn filter(threads: Vec<CarpoolThread>, criteria: &CarpoolFilter) -> Vec<CarpoolThread> {
    threads
        .into_iter()
        .filter(|thread| criteria.matches(thread))
        .collect()
}

/// Stable ascending sort by `(date, time_window.start)`.
pub fn sort_by_soonest(mut threads: Vec<CarpoolThread>) -> Vec<CarpoolThread> {
    threads.sort_by(|a, b| {
        (a.date, a.time_window.start.as_str()).cmp(&(b.date, b.time_window.start.as_str()))
    });
    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::carpool::TimeWindowInput;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap()
    }

    fn input(seats: i32) -> NewCarpool {
        NewCarpool {
            destination: Some("Airport".to_string()),
            date: Some("2025-04-10".to_string()),
            time_window: Some(TimeWindowInput {
                start: Some("08:00".to_string()),
                end: Some("09:00".to_string()),
            }),
            pickup_area: Some("North Campus".to_string()),
            seats_needed: Some(seats),
            notes: Some("Two suitcases".to_string()),
            status: None,
        }
    }

    fn created(creator: Uuid, seats: i32) -> CarpoolThread {
        create(creator, input(seats), &CarpoolLimits::default(), t0()).unwrap()
    }

    fn validation_field(err: DomainError) -> String {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    // =========================================================================
    // create
    // =========================================================================

    #[test]
    fn test_create_auto_joins_and_confirms_creator() {
        let creator = Uuid::new_v4();
        let thread = created(creator, 2);

        assert_eq!(thread.status, CarpoolStatus::Open);
        assert_eq!(thread.target_group_size, 3);
        assert_eq!(thread.interested_count, 1);
        assert_eq!(thread.confirmed_count, 1);
        let participant = thread.participant(creator).unwrap();
        assert!(participant.is_creator);
        assert_eq!(participant.confirmed_at, Some(t0()));
        assert_eq!(thread.created_at, t0());
        assert_eq!(thread.date, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());
    }

    #[test]
    fn test_create_trims_and_drops_blank_notes() {
        let mut new = input(1);
        new.destination = Some("  Downtown  ".to_string());
        new.notes = Some("   ".to_string());
        let thread = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap();
        assert_eq!(thread.destination, "Downtown");
        assert!(thread.notes.is_none());
    }

    #[test]
    fn test_create_with_draft_override() {
        let mut new = input(1);
        new.status = Some(CarpoolStatus::Draft);
        let thread = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap();
        assert_eq!(thread.status, CarpoolStatus::Draft);
    }

    #[test]
    fn test_create_rejects_other_status_overrides() {
        let mut new = input(1);
        new.status = Some(CarpoolStatus::Confirmed);
        let err = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "status");
    }

    #[test]
    fn test_create_rejects_zero_seats() {
        let err = create(Uuid::new_v4(), input(0), &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "seatsNeeded");
    }

    #[test]
    fn test_create_rejects_too_many_seats() {
        let limits = CarpoolLimits {
            max_seats_needed: 3,
        };
        let err = create(Uuid::new_v4(), input(4), &limits, t0()).unwrap_err();
        assert_eq!(validation_field(err), "seatsNeeded");
    }

    #[test]
    fn test_create_reports_first_missing_field() {
        let err = create(
            Uuid::new_v4(),
            NewCarpool::default(),
            &CarpoolLimits::default(),
            t0(),
        )
        .unwrap_err();
        assert_eq!(validation_field(err), "destination");

        let mut new = input(1);
        new.pickup_area = None;
        new.seats_needed = None;
        let err = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "pickupArea");
    }

    #[test]
    fn test_create_rejects_bad_date_and_time() {
        let mut new = input(1);
        new.date = Some("April 10".to_string());
        let err = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "date");

        let mut new = input(1);
        new.time_window = Some(TimeWindowInput {
            start: Some("8am".to_string()),
            end: Some("09:00".to_string()),
        });
        let err = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "timeWindow.start");

        let mut new = input(1);
        new.time_window = Some(TimeWindowInput {
            start: Some("08:00".to_string()),
            end: None,
        });
        let err = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "timeWindow.end");
    }

    #[test]
    fn test_create_rejects_long_notes() {
        let mut new = input(1);
        new.notes = Some("n".repeat(MAX_NOTES_CHARS + 1));
        let err = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap_err();
        assert_eq!(validation_field(err), "notes");
    }

    // =========================================================================
    // join
    // =========================================================================

    #[test]
    fn test_join_moves_open_to_pending() {
        let thread = created(Uuid::new_v4(), 2);
        let rider = Uuid::new_v4();
        let later = t0() + Duration::minutes(5);

        let t = join(thread, rider, later).unwrap();
        assert!(t.changed);
        assert_eq!(t.thread.interested_count, 2);
        assert_eq!(t.thread.confirmed_count, 1);
        assert_eq!(t.thread.status, CarpoolStatus::PendingConfirmations);
        assert_eq!(t.thread.updated_at, later);
        let participant = t.thread.participant(rider).unwrap();
        assert!(!participant.is_confirmed());
        assert!(!participant.is_creator);
        assert_eq!(participant.joined_at, later);
    }

    #[test]
    fn test_join_is_idempotent() {
        let thread = created(Uuid::new_v4(), 2);
        let rider = Uuid::new_v4();

        let once = join(thread, rider, t0()).unwrap().thread;
        let twice = join(once.clone(), rider, t0() + Duration::hours(1)).unwrap();
        assert!(!twice.changed);
        assert_eq!(twice.thread, once);
    }

    #[test]
    fn test_join_beyond_target_is_permitted() {
        let mut thread = created(Uuid::new_v4(), 1);
        for _ in 0..3 {
            thread = join(thread, Uuid::new_v4(), t0()).unwrap().thread;
        }
        assert_eq!(thread.interested_count, 4);
        assert_eq!(thread.target_group_size, 2);
    }

    #[test]
    fn test_join_draft_keeps_status() {
        let mut new = input(2);
        new.status = Some(CarpoolStatus::Draft);
        let thread = create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap();
        let t = join(thread, Uuid::new_v4(), t0()).unwrap();
        assert_eq!(t.thread.status, CarpoolStatus::Draft);
    }

    #[test]
    fn test_join_locked_thread_is_refused() {
        let creator = Uuid::new_v4();
        let locked = lock(created(creator, 2), creator, t0()).unwrap().thread;
        let err = join(locked, Uuid::new_v4(), t0()).unwrap_err();
        assert!(matches!(err, DomainError::Policy(_)));
    }

    #[test]
    fn test_join_locked_thread_by_existing_member_is_noop() {
        let creator = Uuid::new_v4();
        let locked = lock(created(creator, 2), creator, t0()).unwrap().thread;
        let t = join(locked, creator, t0()).unwrap();
        assert!(!t.changed);
    }

    // =========================================================================
    // confirm / unconfirm
    // =========================================================================

    #[test]
    fn test_confirm_requires_participant() {
        let thread = created(Uuid::new_v4(), 2);
        let err = confirm(thread, Uuid::new_v4(), t0()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn test_confirm_counts_and_never_auto_locks() {
        let thread = created(Uuid::new_v4(), 1);
        let rider = Uuid::new_v4();
        let thread = join(thread, rider, t0()).unwrap().thread;

        let t = confirm(thread, rider, t0()).unwrap();
        assert!(t.changed);
        assert_eq!(t.thread.confirmed_count, 2);
        assert_eq!(t.thread.confirmed_count, t.thread.target_group_size);
        assert_eq!(t.thread.status, CarpoolStatus::PendingConfirmations);
        assert!(t.thread.locked_at.is_none());
    }

    #[test]
    fn test_confirm_twice_is_noop() {
        let thread = created(Uuid::new_v4(), 2);
        let rider = Uuid::new_v4();
        let thread = join(thread, rider, t0()).unwrap().thread;
        let thread = confirm(thread, rider, t0()).unwrap().thread;

        let t = confirm(thread.clone(), rider, t0() + Duration::hours(1)).unwrap();
        assert!(!t.changed);
        assert_eq!(t.thread, thread);
    }

    #[test]
    fn test_confirm_then_unconfirm_restores_count() {
        let thread = created(Uuid::new_v4(), 3);
        let rider = Uuid::new_v4();
        let thread = join(thread, rider, t0()).unwrap().thread;
        let before = thread.confirmed_count;

        let thread = confirm(thread, rider, t0()).unwrap().thread;
        let t = unconfirm(thread, rider, t0()).unwrap();
        assert!(t.changed);
        assert_eq!(t.thread.confirmed_count, before);
        assert_eq!(t.thread.status, CarpoolStatus::PendingConfirmations);
        assert!(t.thread.participant(rider).unwrap().confirmed_at.is_none());
    }

    #[test]
    fn test_unconfirm_noops() {
        let creator = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let thread = join(created(creator, 2), rider, t0()).unwrap().thread;

        // unknown user
        assert!(!unconfirm(thread.clone(), Uuid::new_v4(), t0()).unwrap().changed);
        // joined but not confirmed
        assert!(!unconfirm(thread.clone(), rider, t0()).unwrap().changed);
        // creator stays confirmed
        let t = unconfirm(thread, creator, t0()).unwrap();
        assert!(!t.changed);
        assert!(t.thread.participant(creator).unwrap().is_confirmed());
    }

    #[test]
    fn test_unconfirm_on_confirmed_thread_is_noop() {
        let creator = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let thread = join(created(creator, 2), rider, t0()).unwrap().thread;
        let thread = confirm(thread, rider, t0()).unwrap().thread;
        let locked = lock(thread, creator, t0()).unwrap().thread;

        let t = unconfirm(locked.clone(), rider, t0()).unwrap();
        assert!(!t.changed);
        assert_eq!(t.thread, locked);
        assert_eq!(t.thread.status, CarpoolStatus::Confirmed);
    }

    #[test]
    fn test_unconfirm_on_canceled_thread_is_noop() {
        let creator = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let thread = join(created(creator, 2), rider, t0()).unwrap().thread;
        let thread = confirm(thread, rider, t0()).unwrap().thread;
        let canceled = cancel(thread, creator, t0()).unwrap().thread;

        let t = unconfirm(canceled, rider, t0()).unwrap();
        assert!(!t.changed);
        assert_eq!(t.thread.status, CarpoolStatus::Canceled);
    }

    #[test]
    fn test_unconfirm_to_zero_reopens() {
        // The creator invariant keeps confirmed_count >= 1 for created
        // threads; build a record without a confirmed creator to reach zero.
        let rider = Uuid::new_v4();
        let mut thread = created(Uuid::new_v4(), 2);
        thread.participants = vec![CarpoolParticipant {
            user_id: rider,
            joined_at: t0(),
            confirmed_at: Some(t0()),
            is_creator: false,
        }];
        thread.status = CarpoolStatus::PendingConfirmations;
        let thread = recompute(thread);

        let t = unconfirm(thread, rider, t0()).unwrap();
        assert_eq!(t.thread.confirmed_count, 0);
        assert_eq!(t.thread.status, CarpoolStatus::Open);
    }

    // =========================================================================
    // lock / cancel
    // =========================================================================

    #[test]
    fn test_lock_from_open_without_threshold() {
        let creator = Uuid::new_v4();
        let later = t0() + Duration::days(1);
        let t = lock(created(creator, 4), creator, later).unwrap();
        assert_eq!(t.thread.status, CarpoolStatus::Confirmed);
        assert_eq!(t.thread.locked_at, Some(later));
    }

    #[test]
    fn test_lock_by_non_creator_is_forbidden() {
        let err = lock(created(Uuid::new_v4(), 2), Uuid::new_v4(), t0()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn test_lock_from_other_statuses_fails() {
        let creator = Uuid::new_v4();
        let locked = lock(created(creator, 2), creator, t0()).unwrap().thread;
        assert!(matches!(
            lock(locked, creator, t0()).unwrap_err(),
            DomainError::Policy(_)
        ));

        let canceled = cancel(created(creator, 2), creator, t0()).unwrap().thread;
        assert!(matches!(
            lock(canceled, creator, t0()).unwrap_err(),
            DomainError::Policy(_)
        ));

        let mut draft = input(2);
        draft.status = Some(CarpoolStatus::Draft);
        let draft = create(creator, draft, &CarpoolLimits::default(), t0()).unwrap();
        assert!(matches!(
            lock(draft, creator, t0()).unwrap_err(),
            DomainError::Policy(_)
        ));
    }

    #[test]
    fn test_locked_thread_is_frozen() {
        let creator = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let thread = join(created(creator, 2), rider, t0()).unwrap().thread;
        let locked = lock(thread, creator, t0()).unwrap().thread;

        assert!(confirm(locked.clone(), rider, t0()).is_err());
        assert!(join(locked.clone(), Uuid::new_v4(), t0()).is_err());
        assert_eq!(
            unconfirm(locked.clone(), creator, t0()).unwrap().thread,
            locked
        );
    }

    #[test]
    fn test_cancel_from_any_status() {
        let creator = Uuid::new_v4();
        let open = created(creator, 2);
        let pending = join(open.clone(), Uuid::new_v4(), t0()).unwrap().thread;
        let locked = lock(pending.clone(), creator, t0()).unwrap().thread;

        for thread in [open, pending, locked] {
            let later = t0() + Duration::hours(3);
            let t = cancel(thread, creator, later).unwrap();
            assert!(t.changed);
            assert_eq!(t.thread.status, CarpoolStatus::Canceled);
            assert_eq!(t.thread.canceled_at, Some(later));
        }
    }

    #[test]
    fn test_cancel_by_non_creator_is_forbidden() {
        let err = cancel(created(Uuid::new_v4(), 2), Uuid::new_v4(), t0()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    // =========================================================================
    // Full scenario
    // =========================================================================

    #[test]
    fn test_create_join_confirm_lock_scenario() {
        let creator = Uuid::new_v4();
        let rider = Uuid::new_v4();

        let thread = created(creator, 2);
        assert_eq!(
            (thread.target_group_size, thread.interested_count, thread.confirmed_count),
            (3, 1, 1)
        );
        assert_eq!(thread.status, CarpoolStatus::Open);

        let thread = join(thread, rider, t0()).unwrap().thread;
        assert_eq!(thread.interested_count, 2);
        assert_eq!(thread.status, CarpoolStatus::PendingConfirmations);

        let thread = confirm(thread, rider, t0()).unwrap().thread;
        assert_eq!(thread.confirmed_count, 2);
        assert_eq!(thread.status, CarpoolStatus::PendingConfirmations);

        let thread = lock(thread, creator, t0()).unwrap().thread;
        assert_eq!(thread.status, CarpoolStatus::Confirmed);
        assert!(thread.locked_at.is_some());
    }

    // =========================================================================
    // filter / sort
    // =========================================================================

    fn on(date: &str, start: &str, destination: &str) -> CarpoolThread {
        let mut new = input(1);
        new.date = Some(date.to_string());
        new.destination = Some(destination.to_string());
        new.time_window = Some(TimeWindowInput {
            start: Some(start.to_string()),
            end: Some("23:00".to_string()),
        });
        create(Uuid::new_v4(), new, &CarpoolLimits::default(), t0()).unwrap()
    }

    #[test]
    fn test_sort_by_soonest_orders_by_date_then_start() {
        let a = on("2025-01-02", "08:00", "A");
        let b = on("2025-01-01", "08:00", "B");
        let c = on("2025-01-01", "07:30", "C");

        let sorted = sort_by_soonest(vec![a, b, c]);
        let names: Vec<_> = sorted.iter().map(|t| t.destination.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_by_soonest_is_stable() {
        let first = on("2025-01-01", "08:00", "first");
        let second = on("2025-01-01", "08:00", "second");
        let sorted = sort_by_soonest(vec![first, second]);
        assert_eq!(sorted[0].destination, "first");
        assert_eq!(sorted[1].destination, "second");
    }

    #[test]
    fn test_filter_and_semantics() {
        let creator = Uuid::new_v4();
        let airport = on("2025-01-01", "08:00", "SFO Airport");
        let mut downtown = on("2025-01-01", "08:00", "Downtown");
        downtown.creator_id = creator;
        let later_airport = on("2025-01-05", "08:00", "Oakland airport");
        let canceled = cancel(downtown.clone(), creator, t0()).unwrap().thread;

        let all = vec![airport, downtown, later_airport, canceled];

        let by_destination = filter(
            all.clone(),
            &CarpoolFilter {
                destination: Some("AIRPORT".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_destination.len(), 2);

        let by_both = filter(
            all.clone(),
            &CarpoolFilter {
                destination: Some("airport".to_string()),
                date: NaiveDate::from_ymd_opt(2025, 1, 5),
                ..Default::default()
            },
        );
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].destination, "Oakland airport");

        let by_status = filter(
            all.clone(),
            &CarpoolFilter {
                statuses: vec![CarpoolStatus::Canceled, CarpoolStatus::Confirmed],
                ..Default::default()
            },
        );
        assert_eq!(by_status.len(), 1);

        assert_eq!(filter(all, &CarpoolFilter::default()).len(), 4);
    }

    #[test]
    fn test_recompute_ignores_stale_counters() {
        let mut thread = created(Uuid::new_v4(), 2);
        thread.interested_count = 42;
        thread.confirmed_count = 17;
        let thread = recompute(thread);
        assert_eq!((thread.interested_count, thread.confirmed_count), (1, 1));
    }
}
