//! Event and occurrence entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: i64,
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            event_type: entity.event_type,
            description: entity.description,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the event_occurrences table.
#[derive(Debug, Clone, FromRow)]
pub struct EventOccurrenceEntity {
    pub id: i64,
    pub event_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub survey_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<EventOccurrenceEntity> for domain::models::EventOccurrence {
    fn from(entity: EventOccurrenceEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            location: entity.location,
            capacity: entity.capacity,
            registration_deadline: entity.registration_deadline,
            survey_sent: entity.survey_sent,
            created_at: entity.created_at,
        }
    }
}

/// Row mapping for occurrence listings joined with their event and active
/// registration count.
#[derive(Debug, Clone, FromRow)]
pub struct OccurrenceSummaryEntity {
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

impl From<OccurrenceSummaryEntity> for domain::models::event::OccurrenceSummary {
    fn from(entity: OccurrenceSummaryEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            event_name: entity.event_name,
            event_type: entity.event_type,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            location: entity.location,
            capacity: entity.capacity,
            registration_deadline: entity.registration_deadline,
            active_registrations: entity.active_registrations,
        }
    }
}

/// Row mapping for survey dispatch candidates: an unsent occurrence that
/// ended inside the dispatch window, with its event title.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyCandidateEntity {
    pub occurrence_id: i64,
    pub event_id: i64,
    pub event_name: String,
    pub ends_at: DateTime<Utc>,
}
