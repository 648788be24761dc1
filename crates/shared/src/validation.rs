//! Common validation utilities for profile, RSVP, and survey fields.

use chrono::{NaiveDate, Utc};
use validator::ValidationError;

lazy_static::lazy_static! {
    // Loose North-American phone shape: optional +1, 10 digits, common separators.
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^(\+1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}$").unwrap();
}

/// Validates a phone number in loose North-American format.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must be a valid 10-digit number".into());
        Err(err)
    }
}

/// Validates a two-letter US state/territory abbreviation.
pub fn validate_state_code(state: &str) -> Result<(), ValidationError> {
    if state.len() == 2 && state.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("state_code");
        err.message = Some("State must be a two-letter abbreviation".into());
        Err(err)
    }
}

/// Validates a birthdate: not in the future, not implausibly old.
pub fn validate_birthdate(birthdate: &NaiveDate) -> Result<(), ValidationError> {
    let birthdate = *birthdate;
    let today = Utc::now().date_naive();

    if birthdate > today {
        let mut err = ValidationError::new("birthdate_future");
        err.message = Some("Birthdate cannot be in the future".into());
        return Err(err);
    }

    if today.years_since(birthdate).unwrap_or(0) > 120 {
        let mut err = ValidationError::new("birthdate_old");
        err.message = Some("Birthdate is not plausible".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a survey rating (1 to 5).
pub fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("Rating must be between 1 and 5".into());
        Err(err)
    }
}

/// Validates a driver's offered seat count (1 to 8).
pub fn validate_seat_count(seats: i32) -> Result<(), ValidationError> {
    if (1..=8).contains(&seats) {
        Ok(())
    } else {
        let mut err = ValidationError::new("seat_count_range");
        err.message = Some("Seat count must be between 1 and 8".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("801-555-0134").is_ok());
        assert!(validate_phone("(801) 555-0134").is_ok());
        assert!(validate_phone("+1 801.555.0134").is_ok());
        assert!(validate_phone("8015550134").is_ok());
        assert!(validate_phone("555-0134").is_err());
        assert!(validate_phone("not-a-phone").is_err());
    }

    #[test]
    fn test_validate_phone_error_message() {
        let err = validate_phone("12").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Phone number must be a valid 10-digit number"
        );
    }

    #[test]
    fn test_validate_state_code() {
        assert!(validate_state_code("UT").is_ok());
        assert!(validate_state_code("CA").is_ok());
        assert!(validate_state_code("Utah").is_err());
        assert!(validate_state_code("ut").is_err());
        assert!(validate_state_code("U").is_err());
    }

    #[test]
    fn test_validate_birthdate_future() {
        let future = Utc::now().date_naive() + chrono::Duration::days(30);
        assert!(validate_birthdate(&future).is_err());
    }

    #[test]
    fn test_validate_birthdate_plausible() {
        let birthdate = NaiveDate::from_ymd_opt(2006, 4, 12).unwrap();
        assert!(validate_birthdate(&birthdate).is_ok());
    }

    #[test]
    fn test_validate_birthdate_implausibly_old() {
        let birthdate = NaiveDate::from_ymd_opt(1880, 1, 1).unwrap();
        assert!(validate_birthdate(&birthdate).is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_seat_count() {
        assert!(validate_seat_count(1).is_ok());
        assert!(validate_seat_count(8).is_ok());
        assert!(validate_seat_count(0).is_err());
        assert!(validate_seat_count(9).is_err());
    }
}
