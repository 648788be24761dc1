//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod carpool;
pub mod credential;
pub mod donation;
pub mod event;
pub mod milestone;
pub mod person;
pub mod registration;
pub mod survey;

pub use carpool::{CarpoolMatchEntity, DriverOfferEntity, RiderRequestEntity};
pub use credential::CredentialEntity;
pub use donation::{DonationEntity, DonationWithDonorEntity};
pub use event::{EventEntity, EventOccurrenceEntity, OccurrenceSummaryEntity, SurveyCandidateEntity};
pub use milestone::MilestoneEntity;
pub use person::PersonEntity;
pub use registration::{RegistrationEntity, RegistrationWithEventEntity, SurveyRecipientEntity};
pub use survey::SurveyResponseEntity;
