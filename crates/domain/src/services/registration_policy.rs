//! RSVP precondition policy.
//!
//! Checks run in a fixed order; the first failure wins. The storage layer
//! still arbitrates duplicates and capacity under concurrency, so these
//! checks exist to give callers the specific message for their situation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::event::EventOccurrence;

/// Reasons an RSVP or cancellation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationDenied {
    #[error("This event has already ended")]
    EventEnded,

    #[error("The registration deadline for this event has passed")]
    DeadlinePassed,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("This event is full")]
    EventFull,

    #[error("You are not registered for this event")]
    NotRegistered,
}

/// Evaluates whether a new RSVP may be taken for `occurrence`.
///
/// `has_active` and `active_count` reflect the caller's current view of the
/// registration ledger for (person, occurrence) and occurrence respectively.
pub fn evaluate_rsvp(
    occurrence: &EventOccurrence,
    now: DateTime<Utc>,
    has_active: bool,
    active_count: i64,
) -> Result<(), RegistrationDenied> {
    if occurrence.ends_at <= now {
        return Err(RegistrationDenied::EventEnded);
    }

    if let Some(deadline) = occurrence.registration_deadline {
        if deadline <= now {
            return Err(RegistrationDenied::DeadlinePassed);
        }
    }

    if has_active {
        return Err(RegistrationDenied::AlreadyRegistered);
    }

    if let Some(capacity) = occurrence.capacity {
        if active_count >= capacity as i64 {
            return Err(RegistrationDenied::EventFull);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn occurrence(capacity: Option<i32>, deadline: Option<DateTime<Utc>>) -> EventOccurrence {
        let now = Utc::now();
        EventOccurrence {
            id: 1,
            event_id: 1,
            starts_at: now + Duration::days(3),
            ends_at: now + Duration::days(3) + Duration::hours(2),
            location: Some("Provo Library".to_string()),
            capacity,
            registration_deadline: deadline,
            survey_sent: false,
            created_at: now,
        }
    }

    #[test]
    fn test_open_event_accepts_rsvp() {
        let occ = occurrence(Some(40), None);
        assert!(evaluate_rsvp(&occ, Utc::now(), false, 10).is_ok());
    }

    #[test]
    fn test_ended_event_rejected() {
        let mut occ = occurrence(None, None);
        occ.ends_at = Utc::now() - Duration::hours(1);
        assert_eq!(
            evaluate_rsvp(&occ, Utc::now(), false, 0),
            Err(RegistrationDenied::EventEnded)
        );
    }

    #[test]
    fn test_passed_deadline_rejected() {
        let occ = occurrence(None, Some(Utc::now() - Duration::hours(1)));
        assert_eq!(
            evaluate_rsvp(&occ, Utc::now(), false, 0),
            Err(RegistrationDenied::DeadlinePassed)
        );
    }

    #[test]
    fn test_duplicate_rsvp_rejected() {
        let occ = occurrence(Some(40), None);
        assert_eq!(
            evaluate_rsvp(&occ, Utc::now(), true, 1),
            Err(RegistrationDenied::AlreadyRegistered)
        );
    }

    #[test]
    fn test_full_event_rejected() {
        let occ = occurrence(Some(1), None);
        assert_eq!(
            evaluate_rsvp(&occ, Utc::now(), false, 1),
            Err(RegistrationDenied::EventFull)
        );
    }

    #[test]
    fn test_unlimited_capacity_never_full() {
        let occ = occurrence(None, None);
        assert!(evaluate_rsvp(&occ, Utc::now(), false, 10_000).is_ok());
    }

    #[test]
    fn test_ended_wins_over_already_registered() {
        // Check order is fixed: an ended event reports EventEnded even for
        // someone already registered.
        let mut occ = occurrence(Some(1), None);
        occ.ends_at = Utc::now() - Duration::hours(1);
        assert_eq!(
            evaluate_rsvp(&occ, Utc::now(), true, 1),
            Err(RegistrationDenied::EventEnded)
        );
    }

    #[test]
    fn test_already_registered_wins_over_full() {
        let occ = occurrence(Some(1), None);
        assert_eq!(
            evaluate_rsvp(&occ, Utc::now(), true, 1),
            Err(RegistrationDenied::AlreadyRegistered)
        );
    }

    #[test]
    fn test_capacity_freed_by_cancellation_allows_rsvp() {
        let occ = occurrence(Some(1), None);
        // Person A cancelled, so the active count is back to zero.
        assert!(evaluate_rsvp(&occ, Utc::now(), false, 0).is_ok());
    }
}
