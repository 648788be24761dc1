//! Registration (RSVP) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use shared::validation::validate_seat_count;

/// Registration lifecycle status. Cancellation is a soft flip; rows are
/// retained for attendance history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Active,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Active => "active",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(RegistrationStatus::Active),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            _ => Err(format!("Invalid registration status: {}", s)),
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One person's RSVP to one event occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Registration {
    pub id: i64,
    pub person_id: i64,
    pub occurrence_id: i64,
    pub status: RegistrationStatus,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

/// How a participant plans to get to the event.
///
/// A closed set: unrecognized wire values are rejected at parse time rather
/// than silently treated as "no transportation needed".
#[derive(Debug, Clone, PartialEq)]
pub enum TransportChoice {
    /// Participant needs a seat in a carpool.
    NeedRide {
        address: String,
    },
    /// Participant offers to drive others.
    CanDrive {
        address: String,
        radius_miles: i32,
        seat_count: i32,
    },
    /// Participant will take the chartered bus / public transit.
    Bus,
    /// Participant gets there on their own.
    NoDrive,
    /// Attending remotely; no transportation involved.
    Virtual,
}

impl TransportChoice {
    /// Confirmation copy returned to the participant, varying by choice.
    pub fn confirmation_message(&self) -> &'static str {
        match self {
            TransportChoice::NeedRide { .. } => {
                "RSVP confirmed. We received your carpool request and will match you with a driver before the event."
            }
            TransportChoice::CanDrive { .. } => {
                "RSVP confirmed. Thank you for offering to drive! A coordinator will match riders with you."
            }
            TransportChoice::Bus => {
                "RSVP confirmed. Bus and transit details will be emailed before the event."
            }
            TransportChoice::NoDrive | TransportChoice::Virtual => "RSVP confirmed.",
        }
    }

    /// True when this choice records a carpool entry.
    pub fn involves_carpool(&self) -> bool {
        matches!(
            self,
            TransportChoice::NeedRide { .. } | TransportChoice::CanDrive { .. }
        )
    }
}

/// Wire payload for `POST /events/{occurrence_id}/rsvp`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RsvpRequest {
    #[validate(length(min = 1, message = "A transportation option is required"))]
    pub option: String,

    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,

    #[validate(range(min = 1, max = 100, message = "Radius must be between 1 and 100 miles"))]
    pub radius_miles: Option<i32>,

    #[validate(custom(function = "validate_seat_count"))]
    pub seat_count: Option<i32>,
}

impl RsvpRequest {
    /// Resolves the loosely-typed wire payload into a `TransportChoice`,
    /// enforcing per-option required fields.
    pub fn transport_choice(&self) -> Result<TransportChoice, String> {
        match self.option.as_str() {
            "need-ride" => {
                let address = self
                    .address
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| "A pickup address is required to request a ride".to_string())?;
                Ok(TransportChoice::NeedRide {
                    address: address.to_string(),
                })
            }
            "can-drive" => {
                let address = self
                    .address
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| "A starting address is required to offer a ride".to_string())?;
                let seat_count = self
                    .seat_count
                    .ok_or_else(|| "Seat count is required to offer a ride".to_string())?;
                Ok(TransportChoice::CanDrive {
                    address: address.to_string(),
                    radius_miles: self.radius_miles.unwrap_or(10),
                    seat_count,
                })
            }
            "bus" => Ok(TransportChoice::Bus),
            "no-drive" => Ok(TransportChoice::NoDrive),
            "virtual" => Ok(TransportChoice::Virtual),
            other => Err(format!("Unknown transportation option: {}", other)),
        }
    }
}

/// Response for RSVP creation and cancellation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpResponse {
    pub success: bool,
    pub message: String,
}

/// A registration joined with its event details, for "my registrations".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationSummary {
    pub registration_id: i64,
    pub occurrence_id: i64,
    pub event_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: RegistrationStatus,
    pub attended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsvp(option: &str) -> RsvpRequest {
        RsvpRequest {
            option: option.to_string(),
            address: Some("123 Center St, Provo".to_string()),
            radius_miles: Some(15),
            seat_count: Some(3),
        }
    }

    #[test]
    fn test_transport_choice_need_ride() {
        let choice = rsvp("need-ride").transport_choice().unwrap();
        assert!(matches!(choice, TransportChoice::NeedRide { .. }));
        assert!(choice.involves_carpool());
    }

    #[test]
    fn test_transport_choice_can_drive() {
        let choice = rsvp("can-drive").transport_choice().unwrap();
        match choice {
            TransportChoice::CanDrive {
                radius_miles,
                seat_count,
                ..
            } => {
                assert_eq!(radius_miles, 15);
                assert_eq!(seat_count, 3);
            }
            other => panic!("Expected CanDrive, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_choice_can_drive_defaults_radius() {
        let mut req = rsvp("can-drive");
        req.radius_miles = None;
        match req.transport_choice().unwrap() {
            TransportChoice::CanDrive { radius_miles, .. } => assert_eq!(radius_miles, 10),
            other => panic!("Expected CanDrive, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_choice_requires_address_for_ride_request() {
        let mut req = rsvp("need-ride");
        req.address = None;
        assert!(req.transport_choice().is_err());

        let mut req = rsvp("need-ride");
        req.address = Some("   ".to_string());
        assert!(req.transport_choice().is_err());
    }

    #[test]
    fn test_transport_choice_requires_seats_for_driver() {
        let mut req = rsvp("can-drive");
        req.seat_count = None;
        assert!(req.transport_choice().is_err());
    }

    #[test]
    fn test_transport_choice_rejects_unknown_option() {
        let err = rsvp("teleport").transport_choice().unwrap_err();
        assert!(err.contains("teleport"));
    }

    #[test]
    fn test_no_carpool_side_effect_choices() {
        for option in ["bus", "no-drive", "virtual"] {
            let choice = rsvp(option).transport_choice().unwrap();
            assert!(!choice.involves_carpool(), "{} should not touch carpool", option);
        }
    }

    #[test]
    fn test_confirmation_messages_vary_by_choice() {
        let ride = rsvp("need-ride").transport_choice().unwrap();
        let drive = rsvp("can-drive").transport_choice().unwrap();
        let bus = rsvp("bus").transport_choice().unwrap();
        let plain = rsvp("no-drive").transport_choice().unwrap();

        assert!(ride.confirmation_message().contains("carpool"));
        assert!(drive.confirmation_message().contains("drive"));
        assert!(bus.confirmation_message().contains("Bus"));
        assert_eq!(plain.confirmation_message(), "RSVP confirmed.");
        assert_eq!(
            rsvp("virtual")
                .transport_choice()
                .unwrap()
                .confirmation_message(),
            "RSVP confirmed."
        );
    }

    #[test]
    fn test_registration_status_round_trip() {
        assert_eq!(
            "active".parse::<RegistrationStatus>().unwrap(),
            RegistrationStatus::Active
        );
        assert_eq!(
            "cancelled".parse::<RegistrationStatus>().unwrap(),
            RegistrationStatus::Cancelled
        );
        assert!("pending".parse::<RegistrationStatus>().is_err());
    }
}
