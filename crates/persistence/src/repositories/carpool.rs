//! Carpool repository for database operations.
//!
//! Offers and requests upsert on (occurrence, email): a resubmitted
//! preference replaces the earlier entry instead of appending a duplicate.
//! Emails are normalized to lowercase before they reach this layer.

use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::{CarpoolMatchEntity, DriverOfferEntity, RiderRequestEntity};
use crate::metrics::QueryTimer;

/// Field values for a driver offer upsert.
#[derive(Debug, Clone)]
pub struct DriverOfferInput {
    pub occurrence_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    pub radius_miles: i32,
    pub seat_count: i32,
}

/// Field values for a rider request upsert.
#[derive(Debug, Clone)]
pub struct RiderRequestInput {
    pub occurrence_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
}

/// Repository for carpool database operations.
#[derive(Clone)]
pub struct CarpoolRepository {
    pool: PgPool,
}

impl CarpoolRepository {
    /// Creates a new CarpoolRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Driver offers for an occurrence, oldest first.
    pub async fn list_drivers(
        &self,
        occurrence_id: i64,
    ) -> Result<Vec<DriverOfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_carpool_drivers");
        let result = sqlx::query_as::<_, DriverOfferEntity>(
            r#"
            SELECT id, occurrence_id, email, name, phone, address, radius_miles, seat_count, created_at
            FROM carpool_drivers
            WHERE occurrence_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Rider requests for an occurrence, oldest first.
    pub async fn list_riders(
        &self,
        occurrence_id: i64,
    ) -> Result<Vec<RiderRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_carpool_riders");
        let result = sqlx::query_as::<_, RiderRequestEntity>(
            r#"
            SELECT id, occurrence_id, email, name, phone, address, created_at
            FROM carpool_riders
            WHERE occurrence_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Matches for an occurrence, oldest first.
    pub async fn list_matches(
        &self,
        occurrence_id: i64,
    ) -> Result<Vec<CarpoolMatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_carpool_matches");
        let result = sqlx::query_as::<_, CarpoolMatchEntity>(
            r#"
            SELECT id, occurrence_id, driver_email, rider_email, matched_at
            FROM carpool_matches
            WHERE occurrence_id = $1
            ORDER BY matched_at ASC, id ASC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Upsert a driver offer inside an open transaction.
    pub async fn upsert_driver_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &DriverOfferInput,
    ) -> Result<DriverOfferEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_carpool_driver");
        let result = sqlx::query_as::<_, DriverOfferEntity>(
            r#"
            INSERT INTO carpool_drivers
                (occurrence_id, email, name, phone, address, radius_miles, seat_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (occurrence_id, email) DO UPDATE
            SET name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                radius_miles = EXCLUDED.radius_miles,
                seat_count = EXCLUDED.seat_count
            RETURNING id, occurrence_id, email, name, phone, address, radius_miles, seat_count, created_at
            "#,
        )
        .bind(input.occurrence_id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.radius_miles)
        .bind(input.seat_count)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Upsert a rider request inside an open transaction.
    pub async fn upsert_rider_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &RiderRequestInput,
    ) -> Result<RiderRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_carpool_rider");
        let result = sqlx::query_as::<_, RiderRequestEntity>(
            r#"
            INSERT INTO carpool_riders (occurrence_id, email, name, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (occurrence_id, email) DO UPDATE
            SET name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address
            RETURNING id, occurrence_id, email, name, phone, address, created_at
            "#,
        )
        .bind(input.occurrence_id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Remove a person's offer and request rows for an occurrence.
    pub async fn remove_entries_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
        email: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_carpool_entries");
        let drivers = sqlx::query(
            "DELETE FROM carpool_drivers WHERE occurrence_id = $1 AND email = $2",
        )
        .bind(occurrence_id)
        .bind(email)
        .execute(&mut **tx)
        .await?;
        let riders = sqlx::query(
            "DELETE FROM carpool_riders WHERE occurrence_id = $1 AND email = $2",
        )
        .bind(occurrence_id)
        .bind(email)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(drivers.rows_affected() + riders.rows_affected())
    }

    /// Dissolve every match involving the email for an occurrence, as
    /// driver or rider. Runs in the cancellation transaction so a withdrawn
    /// participant never leaves a confirmed match behind.
    pub async fn dissolve_matches_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
        email: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("dissolve_carpool_matches");
        let result = sqlx::query(
            r#"
            DELETE FROM carpool_matches
            WHERE occurrence_id = $1 AND (driver_email = $2 OR rider_email = $2)
            "#,
        )
        .bind(occurrence_id)
        .bind(email)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Lock a driver offer row for the rest of the transaction.
    ///
    /// Serializes concurrent match attempts against the same driver so the
    /// seat-count check cannot overshoot.
    pub async fn find_driver_for_update_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
        email: &str,
    ) -> Result<Option<DriverOfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_carpool_driver_for_update");
        let result = sqlx::query_as::<_, DriverOfferEntity>(
            r#"
            SELECT id, occurrence_id, email, name, phone, address, radius_miles, seat_count, created_at
            FROM carpool_drivers
            WHERE occurrence_id = $1 AND email = $2
            FOR UPDATE
            "#,
        )
        .bind(occurrence_id)
        .bind(email)
        .fetch_optional(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// List riders inside an open transaction (for match validation).
    pub async fn list_riders_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
    ) -> Result<Vec<RiderRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_carpool_riders_tx");
        let result = sqlx::query_as::<_, RiderRequestEntity>(
            r#"
            SELECT id, occurrence_id, email, name, phone, address, created_at
            FROM carpool_riders
            WHERE occurrence_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// List matches inside an open transaction (for match validation).
    pub async fn list_matches_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
    ) -> Result<Vec<CarpoolMatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_carpool_matches_tx");
        let result = sqlx::query_as::<_, CarpoolMatchEntity>(
            r#"
            SELECT id, occurrence_id, driver_email, rider_email, matched_at
            FROM carpool_matches
            WHERE occurrence_id = $1
            ORDER BY matched_at ASC, id ASC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Insert a match inside an open transaction.
    ///
    /// The unique index on (occurrence_id, driver_email, rider_email)
    /// backstops duplicate pairings under concurrency.
    pub async fn insert_match_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
        driver_email: &str,
        rider_email: &str,
    ) -> Result<CarpoolMatchEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_carpool_match");
        let result = sqlx::query_as::<_, CarpoolMatchEntity>(
            r#"
            INSERT INTO carpool_matches (occurrence_id, driver_email, rider_email)
            VALUES ($1, $2, $3)
            RETURNING id, occurrence_id, driver_email, rider_email, matched_at
            "#,
        )
        .bind(occurrence_id)
        .bind(driver_email)
        .bind(rider_email)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // CarpoolRepository queries require a database connection; matching
    // rules are unit-tested in domain::services::carpool_policy.
}
