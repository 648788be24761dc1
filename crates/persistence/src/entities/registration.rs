//! Registration entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::RegistrationStatus;
use sqlx::FromRow;

/// Database row mapping for the registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: i64,
    pub person_id: i64,
    pub occurrence_id: i64,
    pub status: String,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RegistrationEntity> for domain::models::Registration {
    fn from(entity: RegistrationEntity) -> Self {
        let status = entity
            .status
            .parse::<RegistrationStatus>()
            .unwrap_or(RegistrationStatus::Cancelled);
        Self {
            id: entity.id,
            person_id: entity.person_id,
            occurrence_id: entity.occurrence_id,
            status,
            attended: entity.attended,
            created_at: entity.created_at,
        }
    }
}

/// Row mapping for a registration joined with its event details.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithEventEntity {
    pub registration_id: i64,
    pub occurrence_id: i64,
    pub event_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: String,
    pub attended: bool,
}

impl From<RegistrationWithEventEntity> for domain::models::registration::RegistrationSummary {
    fn from(entity: RegistrationWithEventEntity) -> Self {
        let status = entity
            .status
            .parse::<RegistrationStatus>()
            .unwrap_or(RegistrationStatus::Cancelled);
        Self {
            registration_id: entity.registration_id,
            occurrence_id: entity.occurrence_id,
            event_name: entity.event_name,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            location: entity.location,
            status,
            attended: entity.attended,
        }
    }
}

/// Row mapping for survey recipients: non-cancelled registrants with a
/// usable email address.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyRecipientEntity {
    pub person_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub attended: bool,
}

impl From<SurveyRecipientEntity> for domain::models::survey::SurveyRecipient {
    fn from(entity: SurveyRecipientEntity) -> Self {
        Self {
            person_id: entity.person_id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            attended: entity.attended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_entity_to_domain() {
        let entity = RegistrationEntity {
            id: 21,
            person_id: 3,
            occurrence_id: 11,
            status: "active".to_string(),
            attended: false,
            created_at: Utc::now(),
        };

        let registration: domain::models::Registration = entity.into();
        assert_eq!(registration.status, RegistrationStatus::Active);
    }

    #[test]
    fn test_cancelled_status_conversion() {
        let entity = RegistrationEntity {
            id: 21,
            person_id: 3,
            occurrence_id: 11,
            status: "cancelled".to_string(),
            attended: true,
            created_at: Utc::now(),
        };

        let registration: domain::models::Registration = entity.into();
        assert_eq!(registration.status, RegistrationStatus::Cancelled);
        assert!(registration.attended);
    }
}
