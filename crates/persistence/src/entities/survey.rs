//! Survey response entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the survey_responses table.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyResponseEntity {
    pub id: i64,
    pub occurrence_id: i64,
    pub person_id: Option<i64>,
    pub rating: i32,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<SurveyResponseEntity> for domain::models::SurveyResponse {
    fn from(entity: SurveyResponseEntity) -> Self {
        Self {
            id: entity.id,
            occurrence_id: entity.occurrence_id,
            person_id: entity.person_id,
            rating: entity.rating,
            feedback: entity.feedback,
            submitted_at: entity.submitted_at,
        }
    }
}
