//! Axum request extractors.

pub mod auth;

pub use auth::{ManagerAuth, OptionalUserAuth, UserAuth};
