//! Person repository for database operations.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::PersonEntity;
use crate::metrics::QueryTimer;

/// Field values for creating or upserting a person.
#[derive(Debug, Clone)]
pub struct PersonInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// Optional field updates for a person; None leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct PersonUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// Repository for person-related database operations.
#[derive(Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    /// Creates a new PersonRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new person.
    pub async fn create(&self, input: &PersonInput) -> Result<PersonEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_person");
        let result = sqlx::query_as::<_, PersonEntity>(
            r#"
            INSERT INTO people (email, first_name, last_name, phone, city, state, birthdate)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, first_name, last_name, phone, city, state, birthdate, created_at, updated_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.birthdate)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a person by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<PersonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_person_by_id");
        let result = sqlx::query_as::<_, PersonEntity>(
            r#"
            SELECT id, email, first_name, last_name, phone, city, state, birthdate, created_at, updated_at
            FROM people
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a person by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<PersonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_person_by_email");
        let result = sqlx::query_as::<_, PersonEntity>(
            r#"
            SELECT id, email, first_name, last_name, phone, city, state, birthdate, created_at, updated_at
            FROM people
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List people ordered by last name, paginated.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PersonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_people");
        let result = sqlx::query_as::<_, PersonEntity>(
            r#"
            SELECT id, email, first_name, last_name, phone, city, state, birthdate, created_at, updated_at
            FROM people
            ORDER BY last_name, first_name, id
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

    /// Total number of people.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_people");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM people")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Apply a partial update; absent fields keep their current values.
    pub async fn update(
        &self,
        id: i64,
        update: &PersonUpdate,
    ) -> Result<Option<PersonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_person");
        let result = sqlx::query_as::<_, PersonEntity>(
            r#"
            UPDATE people
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                birthdate = COALESCE($7, birthdate),
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, first_name, last_name, phone, city, state, birthdate, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .bind(&update.city)
        .bind(&update.state)
        .bind(update.birthdate)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a person; dependent rows cascade.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_person");
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Insert-or-update a person by email inside an open transaction.
    ///
    /// Used by donation recording so the person upsert and the donation
    /// insert commit together.
    pub async fn upsert_by_email_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &PersonInput,
    ) -> Result<PersonEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_person_by_email");
        let result = sqlx::query_as::<_, PersonEntity>(
            r#"
            INSERT INTO people (email, first_name, last_name, phone, city, state, birthdate)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = now()
            RETURNING id, email, first_name, last_name, phone, city, state, birthdate, created_at, updated_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.birthdate)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // PersonRepository queries require a database connection; the policy
    // logic they feed is covered by unit tests in the domain crate.
}
