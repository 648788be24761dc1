//! Domain models for Ella Rises.

pub mod carpool;
pub mod credential;
pub mod donation;
pub mod event;
pub mod milestone;
pub mod person;
pub mod registration;
pub mod survey;

pub use carpool::{CarpoolMatch, DriverAvailability, DriverOffer, RiderRequest};
pub use credential::{Credential, Role};
pub use event::{Event, EventOccurrence};
pub use milestone::Milestone;
pub use person::Person;
pub use registration::{Registration, RegistrationStatus, TransportChoice};
pub use survey::SurveyResponse;
