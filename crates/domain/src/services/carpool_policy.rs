//! Carpool matching rules.
//!
//! Validation runs against a loaded snapshot of one occurrence's offers,
//! requests, and matches. Checks run in a fixed order; the first failure
//! wins. Email comparison is case-insensitive; addresses are normalized to
//! lowercase before storage but history may predate that.

use thiserror::Error;

use crate::models::carpool::{CarpoolMatch, DriverAvailability, DriverOffer, RiderRequest};

/// Reasons a driver/rider pairing is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchDenied {
    #[error("No driver offer found for that email")]
    DriverNotFound,

    #[error("No ride request found for that email")]
    RiderNotFound,

    #[error("That driver has no seats available")]
    NoSeatsAvailable,

    #[error("That rider is already matched with a driver")]
    RiderAlreadyMatched,

    #[error("That driver and rider are already matched")]
    DuplicateMatch,
}

fn email_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Validates a proposed pairing against the occurrence's current state.
pub fn validate_match(
    drivers: &[DriverOffer],
    riders: &[RiderRequest],
    matches: &[CarpoolMatch],
    driver_email: &str,
    rider_email: &str,
) -> Result<(), MatchDenied> {
    let driver = drivers
        .iter()
        .find(|d| email_eq(&d.email, driver_email))
        .ok_or(MatchDenied::DriverNotFound)?;

    if !riders.iter().any(|r| email_eq(&r.email, rider_email)) {
        return Err(MatchDenied::RiderNotFound);
    }

    let driver_load = matches
        .iter()
        .filter(|m| email_eq(&m.driver_email, &driver.email))
        .count();
    if driver_load >= driver.seat_count as usize {
        return Err(MatchDenied::NoSeatsAvailable);
    }

    if matches.iter().any(|m| email_eq(&m.rider_email, rider_email)) {
        // Covers the exact-pair duplicate too, but report that case
        // distinctly below.
        if matches
            .iter()
            .any(|m| email_eq(&m.rider_email, rider_email) && email_eq(&m.driver_email, driver_email))
        {
            return Err(MatchDenied::DuplicateMatch);
        }
        return Err(MatchDenied::RiderAlreadyMatched);
    }

    Ok(())
}

/// Riders not present in any match, in request order.
pub fn available_riders(riders: &[RiderRequest], matches: &[CarpoolMatch]) -> Vec<RiderRequest> {
    riders
        .iter()
        .filter(|r| !matches.iter().any(|m| email_eq(&m.rider_email, &r.email)))
        .cloned()
        .collect()
}

/// Every driver offer annotated with its matched count and seats left.
pub fn drivers_with_availability(
    drivers: &[DriverOffer],
    matches: &[CarpoolMatch],
) -> Vec<DriverAvailability> {
    drivers
        .iter()
        .map(|d| {
            let matched_count = matches
                .iter()
                .filter(|m| email_eq(&m.driver_email, &d.email))
                .count() as i64;
            DriverAvailability {
                matched_count,
                available_seats: (d.seat_count as i64 - matched_count).max(0),
                offer: d.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn driver(email: &str, seat_count: i32) -> DriverOffer {
        DriverOffer {
            id: 1,
            occurrence_id: 1,
            email: email.to_string(),
            name: "Driver".to_string(),
            phone: None,
            address: "500 W Center St".to_string(),
            radius_miles: 10,
            seat_count,
            created_at: Utc::now(),
        }
    }

    fn rider(email: &str) -> RiderRequest {
        RiderRequest {
            id: 1,
            occurrence_id: 1,
            email: email.to_string(),
            name: "Rider".to_string(),
            phone: None,
            address: "700 N University Ave".to_string(),
            created_at: Utc::now(),
        }
    }

    fn pairing(driver_email: &str, rider_email: &str) -> CarpoolMatch {
        CarpoolMatch {
            id: 1,
            occurrence_id: 1,
            driver_email: driver_email.to_string(),
            rider_email: rider_email.to_string(),
            matched_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_match() {
        let drivers = vec![driver("d@x.org", 2)];
        let riders = vec![rider("r@x.org")];
        assert!(validate_match(&drivers, &riders, &[], "d@x.org", "r@x.org").is_ok());
    }

    #[test]
    fn test_driver_not_found() {
        let riders = vec![rider("r@x.org")];
        assert_eq!(
            validate_match(&[], &riders, &[], "d@x.org", "r@x.org"),
            Err(MatchDenied::DriverNotFound)
        );
    }

    #[test]
    fn test_rider_not_found() {
        let drivers = vec![driver("d@x.org", 2)];
        assert_eq!(
            validate_match(&drivers, &[], &[], "d@x.org", "r@x.org"),
            Err(MatchDenied::RiderNotFound)
        );
    }

    #[test]
    fn test_seat_limit_enforced() {
        let drivers = vec![driver("d@x.org", 2)];
        let riders = vec![rider("r1@x.org"), rider("r2@x.org"), rider("r3@x.org")];
        let matches = vec![pairing("d@x.org", "r1@x.org"), pairing("d@x.org", "r2@x.org")];
        assert_eq!(
            validate_match(&drivers, &riders, &matches, "d@x.org", "r3@x.org"),
            Err(MatchDenied::NoSeatsAvailable)
        );
    }

    #[test]
    fn test_rider_already_matched_with_other_driver() {
        let drivers = vec![driver("a@x.org", 2), driver("b@x.org", 2)];
        let riders = vec![rider("r@x.org")];
        let matches = vec![pairing("a@x.org", "r@x.org")];
        assert_eq!(
            validate_match(&drivers, &riders, &matches, "b@x.org", "r@x.org"),
            Err(MatchDenied::RiderAlreadyMatched)
        );
    }

    #[test]
    fn test_duplicate_pair_reported_distinctly() {
        let drivers = vec![driver("d@x.org", 2)];
        let riders = vec![rider("r@x.org")];
        let matches = vec![pairing("d@x.org", "r@x.org")];
        assert_eq!(
            validate_match(&drivers, &riders, &matches, "d@x.org", "r@x.org"),
            Err(MatchDenied::DuplicateMatch)
        );
    }

    #[test]
    fn test_seat_check_runs_before_rider_check() {
        // A full driver reports NoSeatsAvailable even when the rider is also
        // already matched elsewhere.
        let drivers = vec![driver("d@x.org", 1), driver("e@x.org", 1)];
        let riders = vec![rider("r1@x.org"), rider("r2@x.org")];
        let matches = vec![pairing("d@x.org", "r1@x.org"), pairing("e@x.org", "r2@x.org")];
        assert_eq!(
            validate_match(&drivers, &riders, &matches, "d@x.org", "r2@x.org"),
            Err(MatchDenied::NoSeatsAvailable)
        );
    }

    #[test]
    fn test_email_comparison_is_case_insensitive() {
        let drivers = vec![driver("Driver@X.org", 1)];
        let riders = vec![rider("Rider@X.org")];
        assert!(validate_match(&drivers, &riders, &[], "driver@x.org", "rider@x.org").is_ok());
    }

    #[test]
    fn test_available_riders_excludes_matched() {
        let riders = vec![rider("r1@x.org"), rider("r2@x.org")];
        let matches = vec![pairing("d@x.org", "r1@x.org")];
        let available = available_riders(&riders, &matches);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].email, "r2@x.org");
    }

    #[test]
    fn test_drivers_with_availability() {
        let drivers = vec![driver("d@x.org", 3)];
        let matches = vec![pairing("d@x.org", "r1@x.org"), pairing("d@x.org", "r2@x.org")];
        let board = drivers_with_availability(&drivers, &matches);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].matched_count, 2);
        assert_eq!(board[0].available_seats, 1);
    }

    #[test]
    fn test_one_seat_scenario() {
        // Driver offers 1 seat; R1 matched, R2 still waiting; a second match
        // attempt fails and R2 remains in the available list.
        let drivers = vec![driver("d@x.org", 1)];
        let riders = vec![rider("r1@x.org"), rider("r2@x.org")];
        let matches = vec![pairing("d@x.org", "r1@x.org")];

        assert_eq!(
            validate_match(&drivers, &riders, &matches, "d@x.org", "r2@x.org"),
            Err(MatchDenied::NoSeatsAvailable)
        );

        let available = available_riders(&riders, &matches);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].email, "r2@x.org");
    }
}
