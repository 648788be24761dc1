//! Application services.

pub mod carpool;
pub mod email;
pub mod registration;
pub mod survey_dispatch;

pub use carpool::{CarpoolError, CarpoolService};
pub use email::EmailService;
pub use registration::{RegistrationService, RsvpError};
pub use survey_dispatch::{PgSurveyStore, SurveyDispatchService, SurveyStore};
