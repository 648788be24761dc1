//! Repository implementations for database operations.

pub mod carpool;
pub mod credential;
pub mod donation;
pub mod event;
pub mod milestone;
pub mod person;
pub mod registration;
pub mod survey;

pub use carpool::CarpoolRepository;
pub use credential::CredentialRepository;
pub use donation::DonationRepository;
pub use event::EventRepository;
pub use milestone::MilestoneRepository;
pub use person::PersonRepository;
pub use registration::RegistrationRepository;
pub use survey::SurveyResponseRepository;
