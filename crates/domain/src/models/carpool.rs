//! Carpool coordination models.
//!
//! Offers and requests are recorded as an RSVP side effect; a coordinator
//! later pairs them. Offer and request rows are retained after matching for
//! the coordinator's audit view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A driver's offer to take riders to an occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DriverOffer {
    pub id: i64,
    pub occurrence_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    pub radius_miles: i32,
    pub seat_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A participant's request for a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RiderRequest {
    pub id: i64,
    pub occurrence_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// A coordinator-made pairing of one driver and one rider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CarpoolMatch {
    pub id: i64,
    pub occurrence_id: i64,
    pub driver_email: String,
    pub rider_email: String,
    pub matched_at: DateTime<Utc>,
}

/// A driver offer annotated with its current load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DriverAvailability {
    #[serde(flatten)]
    pub offer: DriverOffer,
    pub matched_count: i64,
    pub available_seats: i64,
}

/// The coordinator's transportation view for one occurrence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransportationBoard {
    pub occurrence_id: i64,
    pub available_riders: Vec<RiderRequest>,
    pub drivers: Vec<DriverAvailability>,
    pub matches: Vec<CarpoolMatch>,
}

/// Request payload for pairing a driver with a rider.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct MatchRequest {
    #[validate(email(message = "A valid driver email is required"))]
    pub driver_email: String,

    #[validate(email(message = "A valid rider email is required"))]
    pub rider_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_request_validation() {
        let valid = MatchRequest {
            driver_email: "driver@example.org".to_string(),
            rider_email: "rider@example.org".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = MatchRequest {
            driver_email: "driver".to_string(),
            rider_email: "rider@example.org".to_string(),
        };
        assert!(invalid.validate().is_err());
    }
}
