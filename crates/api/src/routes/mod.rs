//! HTTP route handlers.

pub mod auth;
pub mod donations;
pub mod events;
pub mod health;
pub mod milestones;
pub mod people;
pub mod rsvp;
pub mod surveys;
pub mod transportation;
