//! Survey response repository for database operations.

use sqlx::PgPool;

use crate::entities::SurveyResponseEntity;
use crate::metrics::QueryTimer;

/// Repository for survey response database operations.
#[derive(Clone)]
pub struct SurveyResponseRepository {
    pool: PgPool,
}

impl SurveyResponseRepository {
    /// Creates a new SurveyResponseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a survey response for an occurrence.
    pub async fn create(
        &self,
        occurrence_id: i64,
        person_id: Option<i64>,
        rating: i32,
        feedback: Option<&str>,
    ) -> Result<SurveyResponseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_survey_response");
        let result = sqlx::query_as::<_, SurveyResponseEntity>(
            r#"
            INSERT INTO survey_responses (occurrence_id, person_id, rating, feedback)
            VALUES ($1, $2, $3, $4)
            RETURNING id, occurrence_id, person_id, rating, feedback, submitted_at
            "#,
        )
        .bind(occurrence_id)
        .bind(person_id)
        .bind(rating)
        .bind(feedback)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Responses for one occurrence, newest first.
    pub async fn list_for_occurrence(
        &self,
        occurrence_id: i64,
    ) -> Result<Vec<SurveyResponseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_survey_responses");
        let result = sqlx::query_as::<_, SurveyResponseEntity>(
            r#"
            SELECT id, occurrence_id, person_id, rating, feedback, submitted_at
            FROM survey_responses
            WHERE occurrence_id = $1
            ORDER BY submitted_at DESC, id DESC
            "#,
        )
        .bind(occurrence_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
