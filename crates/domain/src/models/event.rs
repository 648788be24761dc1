//! Event domain models.
//!
//! An `Event` is the program definition (name, type, description); each
//! `EventOccurrence` is one scheduled instance with its own time window,
//! location, capacity, and registration deadline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Event type used to exclude survey events from survey dispatch.
pub const SURVEY_EVENT_TYPE: &str = "Survey";

/// An event definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One scheduled instance of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventOccurrence {
    pub id: i64,
    pub event_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    /// None means unlimited.
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub survey_sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an event definition.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Event name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Event type is required"))]
    pub event_type: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Request payload for updating an event definition.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Event name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Event type cannot be empty"))]
    pub event_type: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Request payload for scheduling an occurrence of an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateOccurrenceRequest {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,
}

impl CreateOccurrenceRequest {
    /// Cross-field check: the window must be ordered and any deadline must
    /// not fall after the event ends.
    pub fn check_window(&self) -> Result<(), String> {
        if self.ends_at <= self.starts_at {
            return Err("Event end time must be after the start time".to_string());
        }
        if let Some(deadline) = self.registration_deadline {
            if deadline > self.ends_at {
                return Err("Registration deadline cannot be after the event ends".to_string());
            }
        }
        Ok(())
    }
}

/// An occurrence as shown in listings, with its active registration count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OccurrenceSummary {
    pub id: i64,
    pub event_id: i64,
    pub event_name: String,
    pub event_type: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub active_registrations: i64,
}

impl OccurrenceSummary {
    /// Seats remaining, when the occurrence is capacity-limited.
    pub fn seats_remaining(&self) -> Option<i64> {
        self.capacity
            .map(|cap| (cap as i64 - self.active_registrations).max(0))
    }
}

/// An event definition with its scheduled occurrences.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventWithOccurrences {
    #[serde(flatten)]
    pub event: Event,
    pub occurrences: Vec<EventOccurrence>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_occurrence_request() -> CreateOccurrenceRequest {
        let starts = Utc::now() + Duration::days(7);
        CreateOccurrenceRequest {
            starts_at: starts,
            ends_at: starts + Duration::hours(2),
            location: Some("Provo Library".to_string()),
            capacity: Some(40),
            registration_deadline: Some(starts - Duration::days(1)),
        }
    }

    #[test]
    fn test_check_window_valid() {
        assert!(sample_occurrence_request().check_window().is_ok());
    }

    #[test]
    fn test_check_window_rejects_inverted_times() {
        let mut req = sample_occurrence_request();
        req.ends_at = req.starts_at - Duration::hours(1);
        assert!(req.check_window().is_err());
    }

    #[test]
    fn test_check_window_rejects_deadline_after_end() {
        let mut req = sample_occurrence_request();
        req.registration_deadline = Some(req.ends_at + Duration::hours(1));
        assert!(req.check_window().is_err());
    }

    #[test]
    fn test_seats_remaining() {
        let summary = OccurrenceSummary {
            id: 1,
            event_id: 1,
            event_name: "College Night".to_string(),
            event_type: "Workshop".to_string(),
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            location: None,
            capacity: Some(40),
            registration_deadline: None,
            active_registrations: 38,
        };
        assert_eq!(summary.seats_remaining(), Some(2));
    }

    #[test]
    fn test_seats_remaining_unlimited() {
        let summary = OccurrenceSummary {
            id: 1,
            event_id: 1,
            event_name: "College Night".to_string(),
            event_type: "Workshop".to_string(),
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            location: None,
            capacity: None,
            registration_deadline: None,
            active_registrations: 500,
        };
        assert_eq!(summary.seats_remaining(), None);
    }

    #[test]
    fn test_seats_remaining_never_negative() {
        let summary = OccurrenceSummary {
            id: 1,
            event_id: 1,
            event_name: "College Night".to_string(),
            event_type: "Workshop".to_string(),
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            location: None,
            capacity: Some(10),
            registration_deadline: None,
            active_registrations: 12,
        };
        assert_eq!(summary.seats_remaining(), Some(0));
    }
}
