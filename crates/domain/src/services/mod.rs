//! Domain services for Ella Rises.
//!
//! Pure business policies live here so the HTTP and persistence layers can
//! stay thin and the rules stay testable without a database.

pub mod carpool_policy;
pub mod notification;
pub mod registration_policy;
pub mod survey_window;

pub use carpool_policy::{
    available_riders, drivers_with_availability, validate_match, MatchDenied,
};
pub use notification::{EmailMessage, Mailer, MailerError, MockMailer};
pub use registration_policy::{evaluate_rsvp, RegistrationDenied};
pub use survey_window::previous_utc_day;
