//! Milestone models for tracking participant achievements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An achievement recorded against a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Milestone {
    pub id: i64,
    pub person_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for recording a milestone.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMilestoneRequest {
    #[validate(length(min = 1, max = 200, message = "Milestone title is required"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub achieved_on: Option<NaiveDate>,
}

/// Request payload for editing a milestone; absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMilestoneRequest {
    #[validate(length(min = 1, max = 200, message = "Milestone title cannot be empty"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub achieved_on: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_milestone_request_validation() {
        let valid = CreateMilestoneRequest {
            title: "Accepted to UVU".to_string(),
            description: None,
            achieved_on: NaiveDate::from_ymd_opt(2026, 3, 14),
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateMilestoneRequest {
            title: String::new(),
            description: None,
            achieved_on: None,
        };
        assert!(empty_title.validate().is_err());
    }
}
