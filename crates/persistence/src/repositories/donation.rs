//! Donation repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::{DonationEntity, DonationWithDonorEntity};
use crate::metrics::QueryTimer;

/// Repository for donation database operations.
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Creates a new DonationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a donation inside an open transaction.
    ///
    /// Callers pair this with `PersonRepository::upsert_by_email_tx` so the
    /// donor profile and the donation commit or roll back together.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        person_id: i64,
        amount_cents: i64,
        note: Option<&str>,
    ) -> Result<DonationEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_donation");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            INSERT INTO donations (person_id, amount_cents, note)
            VALUES ($1, $2, $3)
            RETURNING id, person_id, amount_cents, note, donated_at
            "#,
        )
        .bind(person_id)
        .bind(amount_cents)
        .bind(note)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Donations joined with donor info, newest first, paginated.
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DonationWithDonorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_donations");
        let result = sqlx::query_as::<_, DonationWithDonorEntity>(
            r#"
            SELECT
                d.id, p.email AS donor_email, p.first_name, p.last_name,
                d.amount_cents, d.note, d.donated_at
            FROM donations d
            JOIN people p ON d.person_id = p.id
            ORDER BY d.donated_at DESC, d.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Total number of donations.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_donations");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donations")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
