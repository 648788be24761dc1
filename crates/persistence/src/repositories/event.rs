//! Event and occurrence repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{
    EventEntity, EventOccurrenceEntity, OccurrenceSummaryEntity, SurveyCandidateEntity,
};
use crate::metrics::QueryTimer;

/// Field values for scheduling an occurrence.
#[derive(Debug, Clone)]
pub struct OccurrenceInput {
    pub event_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

/// Repository for event and occurrence database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event definition.
    pub async fn create_event(
        &self,
        name: &str,
        event_type: &str,
        description: Option<&str>,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (name, event_type, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, event_type, description, created_at
            "#,
        )
        .bind(name)
        .bind(event_type)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event definition by ID.
    pub async fn find_event(&self, id: i64) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, event_type, description, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all event definitions, newest first.
    pub async fn list_events(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, event_type, description, created_at
            FROM events
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update to an event definition.
    pub async fn update_event(
        &self,
        id: i64,
        name: Option<&str>,
        event_type: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                event_type = COALESCE($3, event_type),
                description = COALESCE($4, description)
            WHERE id = $1
            RETURNING id, name, event_type, description, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(event_type)
        .bind(description)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event definition; occurrences and registrations cascade.
    pub async fn delete_event(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Schedule an occurrence of an event.
    pub async fn create_occurrence(
        &self,
        input: &OccurrenceInput,
    ) -> Result<EventOccurrenceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_occurrence");
        let result = sqlx::query_as::<_, EventOccurrenceEntity>(
            r#"
            INSERT INTO event_occurrences
                (event_id, starts_at, ends_at, location, capacity, registration_deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, event_id, starts_at, ends_at, location, capacity,
                      registration_deadline, survey_sent, created_at
            "#,
        )
        .bind(input.event_id)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(&input.location)
        .bind(input.capacity)
        .bind(input.registration_deadline)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an occurrence by ID.
    pub async fn find_occurrence(
        &self,
        id: i64,
    ) -> Result<Option<EventOccurrenceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_occurrence_by_id");
        let result = sqlx::query_as::<_, EventOccurrenceEntity>(
            r#"
            SELECT id, event_id, starts_at, ends_at, location, capacity,
                   registration_deadline, survey_sent, created_at
            FROM event_occurrences
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List occurrences for one event, soonest first.
    pub async fn list_occurrences_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventOccurrenceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_occurrences_for_event");
        let result = sqlx::query_as::<_, EventOccurrenceEntity>(
            r#"
            SELECT id, event_id, starts_at, ends_at, location, capacity,
                   registration_deadline, survey_sent, created_at
            FROM event_occurrences
            WHERE event_id = $1
            ORDER BY starts_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an occurrence; registrations and carpool rows cascade.
    pub async fn delete_occurrence(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_occurrence");
        let result = sqlx::query("DELETE FROM event_occurrences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Upcoming occurrences joined with event info and active RSVP counts.
    pub async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<OccurrenceSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_upcoming_occurrences");
        let result = sqlx::query_as::<_, OccurrenceSummaryEntity>(
            r#"
            SELECT
                o.id, o.event_id, e.name AS event_name, e.event_type,
                o.starts_at, o.ends_at, o.location, o.capacity, o.registration_deadline,
                (SELECT COUNT(*) FROM registrations r
                 WHERE r.occurrence_id = o.id AND r.status = 'active') AS active_registrations
            FROM event_occurrences o
            JOIN events e ON o.event_id = e.id
            WHERE o.ends_at > $1
            ORDER BY o.starts_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Occurrences that ended inside [window_start, window_end], belong to a
    /// non-survey event, and have not had surveys sent.
    pub async fn survey_candidates(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<SurveyCandidateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_survey_candidates");
        let result = sqlx::query_as::<_, SurveyCandidateEntity>(
            r#"
            SELECT o.id AS occurrence_id, o.event_id, e.name AS event_name, o.ends_at
            FROM event_occurrences o
            JOIN events e ON o.event_id = e.id
            WHERE o.ends_at >= $1
              AND o.ends_at <= $2
              AND o.survey_sent = false
              AND e.event_type <> $3
            ORDER BY o.ends_at ASC
            "#,
        )
        .bind(window_start)
        .bind(window_end)
        .bind(domain::models::event::SURVEY_EVENT_TYPE)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flip the per-occurrence survey idempotency flag.
    pub async fn mark_survey_sent(&self, occurrence_id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_survey_sent");
        let result = sqlx::query(
            "UPDATE event_occurrences SET survey_sent = true WHERE id = $1",
        )
        .bind(occurrence_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // EventRepository queries require a database connection; the survey
    // window logic feeding survey_candidates is unit-tested in the domain
    // crate.
}
