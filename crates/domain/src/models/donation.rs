//! Donation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::person::Person;

/// A recorded donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Donation {
    pub id: i64,
    pub person_id: i64,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub donated_at: DateTime<Utc>,
}

/// Request payload for recording a donation.
///
/// Donors may not have a profile yet, so the payload carries enough to
/// create one; person upsert and donation insert commit together.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RecordDonationRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(range(min = 100, message = "Donation must be at least $1.00"))]
    pub amount_cents: i64,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Response after a donation is recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationReceipt {
    pub donation: Donation,
    pub donor: Person,
}

/// A donation joined with donor contact info, for the manager listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationSummary {
    pub id: i64,
    pub donor_email: String,
    pub donor_name: String,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub donated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_donation_request_validation() {
        let valid = RecordDonationRequest {
            email: "donor@example.org".to_string(),
            first_name: "Rosa".to_string(),
            last_name: "Mendez".to_string(),
            amount_cents: 5000,
            note: Some("For the mentorship fund".to_string()),
        };
        assert!(valid.validate().is_ok());

        let too_small = RecordDonationRequest {
            amount_cents: 50,
            ..valid
        };
        assert!(too_small.validate().is_err());
    }
}
