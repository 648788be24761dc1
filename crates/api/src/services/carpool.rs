//! Carpool service: the coordinator's transportation board and matching.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use domain::models::carpool::TransportationBoard;
use domain::models::CarpoolMatch;
use domain::services::carpool_policy::{
    available_riders, drivers_with_availability, validate_match, MatchDenied,
};
use persistence::repositories::{CarpoolRepository, EventRepository};

use crate::error::ApiError;

/// Errors from carpool operations.
#[derive(Debug, Error)]
pub enum CarpoolError {
    #[error("Event occurrence not found")]
    OccurrenceNotFound,

    #[error(transparent)]
    Denied(#[from] MatchDenied),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<CarpoolError> for ApiError {
    fn from(err: CarpoolError) -> Self {
        match err {
            CarpoolError::OccurrenceNotFound => {
                ApiError::NotFound("Event occurrence not found".to_string())
            }
            CarpoolError::Denied(denied) => denied.into(),
            CarpoolError::Storage(e) => e.into(),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Service for carpool coordination.
#[derive(Clone)]
pub struct CarpoolService {
    pool: PgPool,
}

impl CarpoolService {
    /// Creates a new CarpoolService with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The coordinator's view for one occurrence: unmatched riders, drivers
    /// with their remaining seats, and the matches made so far.
    pub async fn transportation_board(
        &self,
        occurrence_id: i64,
    ) -> Result<TransportationBoard, CarpoolError> {
        let event_repo = EventRepository::new(self.pool.clone());
        event_repo
            .find_occurrence(occurrence_id)
            .await?
            .ok_or(CarpoolError::OccurrenceNotFound)?;

        let carpool_repo = CarpoolRepository::new(self.pool.clone());
        let drivers: Vec<domain::models::DriverOffer> = carpool_repo
            .list_drivers(occurrence_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let riders: Vec<domain::models::RiderRequest> = carpool_repo
            .list_riders(occurrence_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let matches: Vec<CarpoolMatch> = carpool_repo
            .list_matches(occurrence_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(TransportationBoard {
            occurrence_id,
            available_riders: available_riders(&riders, &matches),
            drivers: drivers_with_availability(&drivers, &matches),
            matches,
        })
    }

    /// Pair a driver with a rider.
    ///
    /// The driver offer row is locked for the validation and insert, so two
    /// coordinators cannot oversubscribe the same driver; the unique index
    /// on the (occurrence, driver, rider) triple backstops duplicates.
    pub async fn create_match(
        &self,
        occurrence_id: i64,
        driver_email: &str,
        rider_email: &str,
    ) -> Result<CarpoolMatch, CarpoolError> {
        let driver_email = driver_email.to_lowercase();
        let rider_email = rider_email.to_lowercase();

        let event_repo = EventRepository::new(self.pool.clone());
        event_repo
            .find_occurrence(occurrence_id)
            .await?
            .ok_or(CarpoolError::OccurrenceNotFound)?;

        let mut tx = self.pool.begin().await?;

        let drivers: Vec<domain::models::DriverOffer> =
            CarpoolRepository::find_driver_for_update_tx(&mut tx, occurrence_id, &driver_email)
                .await?
                .map(Into::into)
                .into_iter()
                .collect();
        let riders: Vec<domain::models::RiderRequest> =
            CarpoolRepository::list_riders_tx(&mut tx, occurrence_id)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
        let matches: Vec<CarpoolMatch> =
            CarpoolRepository::list_matches_tx(&mut tx, occurrence_id)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();

        validate_match(&drivers, &riders, &matches, &driver_email, &rider_email)?;

        let created =
            CarpoolRepository::insert_match_tx(&mut tx, occurrence_id, &driver_email, &rider_email)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        CarpoolError::Denied(MatchDenied::DuplicateMatch)
                    } else {
                        CarpoolError::Storage(e)
                    }
                })?;

        tx.commit().await?;

        info!(
            occurrence_id = occurrence_id,
            driver = %driver_email,
            rider = %rider_email,
            "Carpool match created"
        );

        Ok(created.into())
    }
}
