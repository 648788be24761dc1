//! Registration repository for database operations.
//!
//! RSVP creation and cancellation run inside transactions owned by the
//! registration service; the transactional methods here take the open
//! transaction so the capacity check, insert, and carpool side effects
//! commit atomically.

use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::{
    EventOccurrenceEntity, RegistrationEntity, RegistrationWithEventEntity, SurveyRecipientEntity,
};
use crate::metrics::QueryTimer;

/// Repository for registration-related database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the active registration for a (person, occurrence) pair.
    pub async fn find_active(
        &self,
        person_id: i64,
        occurrence_id: i64,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_registration");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, person_id, occurrence_id, status, attended, created_at
            FROM registrations
            WHERE person_id = $1 AND occurrence_id = $2 AND status = 'active'
            "#,
        )
        .bind(person_id)
        .bind(occurrence_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count active registrations for an occurrence.
    pub async fn count_active(&self, occurrence_id: i64) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_registrations");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM registrations
            WHERE occurrence_id = $1 AND status = 'active'
            "#,
        )
        .bind(occurrence_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A person's registrations joined with event details, newest first.
    pub async fn list_for_person(
        &self,
        person_id: i64,
    ) -> Result<Vec<RegistrationWithEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_registrations_for_person");
        let result = sqlx::query_as::<_, RegistrationWithEventEntity>(
            r#"
            SELECT
                r.id AS registration_id, r.occurrence_id, e.name AS event_name,
                o.starts_at, o.ends_at, o.location, r.status, r.attended
            FROM registrations r
            JOIN event_occurrences o ON r.occurrence_id = o.id
            JOIN events e ON o.event_id = e.id
            WHERE r.person_id = $1
            ORDER BY o.starts_at DESC, r.id DESC
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Survey recipients for an occurrence: non-cancelled registrants with a
    /// non-empty email, one row per person.
    pub async fn survey_recipients(
        &self,
        occurrence_id: i64,
    ) -> Result<Vec<SurveyRecipientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_survey_recipients");
        let result = sqlx::query_as::<_, SurveyRecipientEntity>(
            r#"
            SELECT DISTINCT ON (p.id)
                p.id AS person_id, p.email, p.first_name, p.last_name, r.attended
            FROM registrations r
            JOIN people p ON r.person_id = p.id
            WHERE r.occurrence_id = $1
              AND r.status <> 'cancelled'
              AND p.email <> ''
            ORDER BY p.id, r.attended DESC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lock the occurrence row for the rest of the transaction.
    ///
    /// Serializes concurrent RSVPs against the same occurrence so the
    /// capacity re-count below cannot overshoot.
    pub async fn lock_occurrence_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
    ) -> Result<Option<EventOccurrenceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_occurrence_for_update");
        let result = sqlx::query_as::<_, EventOccurrenceEntity>(
            r#"
            SELECT id, event_id, starts_at, ends_at, location, capacity,
                   registration_deadline, survey_sent, created_at
            FROM event_occurrences
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(occurrence_id)
        .fetch_optional(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Count active registrations inside an open transaction.
    pub async fn count_active_tx(
        tx: &mut Transaction<'_, Postgres>,
        occurrence_id: i64,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_registrations_tx");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM registrations
            WHERE occurrence_id = $1 AND status = 'active'
            "#,
        )
        .bind(occurrence_id)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Check for an active registration inside an open transaction.
    pub async fn has_active_tx(
        tx: &mut Transaction<'_, Postgres>,
        person_id: i64,
        occurrence_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("has_active_registration_tx");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM registrations
                WHERE person_id = $1 AND occurrence_id = $2 AND status = 'active'
            )
            "#,
        )
        .bind(person_id)
        .bind(occurrence_id)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Insert an active registration inside an open transaction.
    ///
    /// The partial unique index on (person_id, occurrence_id) WHERE status =
    /// 'active' is the final arbiter of duplicates; a 23505 here means a
    /// concurrent RSVP won.
    pub async fn insert_active_tx(
        tx: &mut Transaction<'_, Postgres>,
        person_id: i64,
        occurrence_id: i64,
    ) -> Result<RegistrationEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_active_registration");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            INSERT INTO registrations (person_id, occurrence_id, status)
            VALUES ($1, $2, 'active')
            RETURNING id, person_id, occurrence_id, status, attended, created_at
            "#,
        )
        .bind(person_id)
        .bind(occurrence_id)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Soft-cancel the active registration inside an open transaction.
    /// Returns the number of rows flipped (0 when none was active).
    pub async fn cancel_active_tx(
        tx: &mut Transaction<'_, Postgres>,
        person_id: i64,
        occurrence_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("cancel_active_registration");
        let result = sqlx::query(
            r#"
            UPDATE registrations
            SET status = 'cancelled'
            WHERE person_id = $1 AND occurrence_id = $2 AND status = 'active'
            "#,
        )
        .bind(person_id)
        .bind(occurrence_id)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Mark attendance for a registration (manager check-in).
    pub async fn set_attended(
        &self,
        registration_id: i64,
        attended: bool,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_registration_attended");
        let result = sqlx::query(
            "UPDATE registrations SET attended = $2 WHERE id = $1",
        )
        .bind(registration_id)
        .bind(attended)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // RegistrationRepository queries require a database connection; the
    // precondition ordering they support is unit-tested in
    // domain::services::registration_policy.
}
