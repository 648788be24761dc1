//! Registration service: RSVP creation and cancellation.
//!
//! Both flows run in a single transaction so the ledger row and the carpool
//! side effects commit or roll back together. The occurrence row is locked
//! for the duration, making the capacity re-count race-free; the partial
//! unique index on active registrations is the final arbiter of duplicates.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use domain::models::registration::TransportChoice;
use domain::models::{Person, Registration};
use domain::services::registration_policy::{evaluate_rsvp, RegistrationDenied};
use persistence::repositories::carpool::{DriverOfferInput, RiderRequestInput};
use persistence::repositories::{CarpoolRepository, RegistrationRepository};

use crate::error::ApiError;

/// Errors from RSVP operations.
#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("Event occurrence not found")]
    OccurrenceNotFound,

    #[error(transparent)]
    Denied(#[from] RegistrationDenied),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<RsvpError> for ApiError {
    fn from(err: RsvpError) -> Self {
        match err {
            RsvpError::OccurrenceNotFound => {
                ApiError::NotFound("Event occurrence not found".to_string())
            }
            RsvpError::Denied(denied) => denied.into(),
            RsvpError::Storage(e) => e.into(),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Service for the registration ledger.
#[derive(Clone)]
pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    /// Creates a new RegistrationService with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an RSVP for a person, recording any carpool preference.
    pub async fn create_rsvp(
        &self,
        person: &Person,
        occurrence_id: i64,
        choice: &TransportChoice,
    ) -> Result<Registration, RsvpError> {
        let mut tx = self.pool.begin().await?;

        let occurrence = RegistrationRepository::lock_occurrence_tx(&mut tx, occurrence_id)
            .await?
            .ok_or(RsvpError::OccurrenceNotFound)?;
        let occurrence: domain::models::EventOccurrence = occurrence.into();

        let has_active =
            RegistrationRepository::has_active_tx(&mut tx, person.id, occurrence_id).await?;
        let active_count = RegistrationRepository::count_active_tx(&mut tx, occurrence_id).await?;

        evaluate_rsvp(&occurrence, Utc::now(), has_active, active_count)?;

        let registration =
            RegistrationRepository::insert_active_tx(&mut tx, person.id, occurrence_id)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        // A concurrent RSVP for the same pair won the race.
                        RsvpError::Denied(RegistrationDenied::AlreadyRegistered)
                    } else {
                        RsvpError::Storage(e)
                    }
                })?;

        let email = person.email.to_lowercase();
        match choice {
            TransportChoice::NeedRide { address } => {
                CarpoolRepository::upsert_rider_tx(
                    &mut tx,
                    &RiderRequestInput {
                        occurrence_id,
                        email,
                        name: person.full_name(),
                        phone: person.phone.clone(),
                        address: address.clone(),
                    },
                )
                .await?;
            }
            TransportChoice::CanDrive {
                address,
                radius_miles,
                seat_count,
            } => {
                CarpoolRepository::upsert_driver_tx(
                    &mut tx,
                    &DriverOfferInput {
                        occurrence_id,
                        email,
                        name: person.full_name(),
                        phone: person.phone.clone(),
                        address: address.clone(),
                        radius_miles: *radius_miles,
                        seat_count: *seat_count,
                    },
                )
                .await?;
            }
            TransportChoice::Bus | TransportChoice::NoDrive | TransportChoice::Virtual => {}
        }

        tx.commit().await?;

        info!(
            person_id = person.id,
            occurrence_id = occurrence_id,
            registration_id = registration.id,
            carpool = choice.involves_carpool(),
            "RSVP created"
        );

        Ok(registration.into())
    }

    /// Cancel a person's active RSVP and withdraw them from the carpool,
    /// dissolving any matches they were part of.
    pub async fn cancel_rsvp(&self, person: &Person, occurrence_id: i64) -> Result<(), RsvpError> {
        let mut tx = self.pool.begin().await?;

        let cancelled =
            RegistrationRepository::cancel_active_tx(&mut tx, person.id, occurrence_id).await?;
        if cancelled == 0 {
            return Err(RsvpError::Denied(RegistrationDenied::NotRegistered));
        }

        let email = person.email.to_lowercase();
        CarpoolRepository::remove_entries_tx(&mut tx, occurrence_id, &email).await?;
        let dissolved =
            CarpoolRepository::dissolve_matches_tx(&mut tx, occurrence_id, &email).await?;

        tx.commit().await?;

        info!(
            person_id = person.id,
            occurrence_id = occurrence_id,
            dissolved_matches = dissolved,
            "RSVP cancelled"
        );

        Ok(())
    }
}
