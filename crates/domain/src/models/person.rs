//! Person domain models for program participants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::{validate_birthdate, validate_phone, validate_state_code};

/// A program participant or community member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Person {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Display name used in email greetings and admin listings.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            "Participant".to_string()
        } else {
            name.to_string()
        }
    }
}

/// Request payload for creating a person (admin) or registering an account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreatePersonRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,

    #[validate(custom(function = "validate_state_code"))]
    pub state: Option<String>,

    #[validate(custom(function = "validate_birthdate"))]
    pub birthdate: Option<NaiveDate>,
}

/// Request payload for updating a person; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdatePersonRequest {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,

    #[validate(custom(function = "validate_state_code"))]
    pub state: Option<String>,

    #[validate(custom(function = "validate_birthdate"))]
    pub birthdate: Option<NaiveDate>,
}

/// Response for paginated person listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListPeopleResponse {
    pub data: Vec<Person>,
    pub page: shared::pagination::PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_person() -> Person {
        Person {
            id: 7,
            email: "amina@example.org".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Flores".to_string(),
            phone: Some("801-555-0134".to_string()),
            city: Some("Provo".to_string()),
            state: Some("UT".to_string()),
            birthdate: NaiveDate::from_ymd_opt(2006, 4, 12),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_person().full_name(), "Amina Flores");
    }

    #[test]
    fn test_full_name_falls_back_for_blank_names() {
        let mut person = sample_person();
        person.first_name = " ".to_string();
        person.last_name = String::new();
        assert_eq!(person.full_name(), "Participant");
    }

    #[test]
    fn test_create_person_request_validation() {
        let valid = CreatePersonRequest {
            email: "amina@example.org".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Flores".to_string(),
            phone: None,
            city: None,
            state: None,
            birthdate: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreatePersonRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let bad_state = CreatePersonRequest {
            state: Some("Utah".to_string()),
            ..valid
        };
        assert!(bad_state.validate().is_err());
    }

    #[test]
    fn test_update_person_request_empty_is_valid() {
        assert!(UpdatePersonRequest::default().validate().is_ok());
    }
}
