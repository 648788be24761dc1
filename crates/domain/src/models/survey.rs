//! Survey models: participant responses and dispatch run reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_rating;

/// A participant's feedback for one event occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SurveyResponse {
    pub id: i64,
    pub occurrence_id: i64,
    pub person_id: Option<i64>,
    pub rating: i32,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Request payload for submitting survey feedback.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitSurveyResponseRequest {
    #[validate(custom(function = "validate_rating"))]
    pub rating: i32,

    #[validate(length(max = 4000, message = "Feedback must be at most 4000 characters"))]
    pub feedback: Option<String>,
}

/// A survey recipient: a non-cancelled registrant with a usable email.
#[derive(Debug, Clone)]
pub struct SurveyRecipient {
    pub person_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub attended: bool,
}

impl SurveyRecipient {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            "Participant".to_string()
        } else {
            name.to_string()
        }
    }
}

/// Per-occurrence outcome of one survey dispatch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OccurrenceDispatchResult {
    pub occurrence_id: i64,
    pub title: String,
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
    /// Set when the occurrence failed before fan-out; counts are zero then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of one survey dispatch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DispatchRunReport {
    pub events_processed: usize,
    pub total_emails_sent: usize,
    pub results: Vec<OccurrenceDispatchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_survey_response_validation() {
        let valid = SubmitSurveyResponseRequest {
            rating: 4,
            feedback: Some("Loved the mentor panel".to_string()),
        };
        assert!(valid.validate().is_ok());

        let out_of_range = SubmitSurveyResponseRequest {
            rating: 9,
            feedback: None,
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_recipient_display_name() {
        let recipient = SurveyRecipient {
            person_id: 1,
            email: "amina@example.org".to_string(),
            first_name: "Amina".to_string(),
            last_name: String::new(),
            attended: true,
        };
        assert_eq!(recipient.display_name(), "Amina");

        let anonymous = SurveyRecipient {
            person_id: 2,
            email: "x@example.org".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            attended: false,
        };
        assert_eq!(anonymous.display_name(), "Participant");
    }
}
