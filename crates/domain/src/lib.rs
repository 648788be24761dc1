//! Domain layer for the Ella Rises backend.
//!
//! This crate contains:
//! - Domain models (people, events, registrations, carpool, milestones,
//!   surveys, donations) and their request/response payloads
//! - Pure business policies (RSVP preconditions, carpool matching rules,
//!   survey dispatch window)
//! - The mailer port used by the survey dispatch job

pub mod models;
pub mod services;
