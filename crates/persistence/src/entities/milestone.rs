//! Milestone entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database row mapping for the milestones table.
#[derive(Debug, Clone, FromRow)]
pub struct MilestoneEntity {
    pub id: i64,
    pub person_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<MilestoneEntity> for domain::models::Milestone {
    fn from(entity: MilestoneEntity) -> Self {
        Self {
            id: entity.id,
            person_id: entity.person_id,
            title: entity.title,
            description: entity.description,
            achieved_on: entity.achieved_on,
            created_at: entity.created_at,
        }
    }
}
