//! Milestone repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::entities::MilestoneEntity;
use crate::metrics::QueryTimer;

/// Repository for milestone database operations.
#[derive(Clone)]
pub struct MilestoneRepository {
    pool: PgPool,
}

impl MilestoneRepository {
    /// Creates a new MilestoneRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a milestone for a person.
    pub async fn create(
        &self,
        person_id: i64,
        title: &str,
        description: Option<&str>,
        achieved_on: Option<NaiveDate>,
    ) -> Result<MilestoneEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_milestone");
        let result = sqlx::query_as::<_, MilestoneEntity>(
            r#"
            INSERT INTO milestones (person_id, title, description, achieved_on)
            VALUES ($1, $2, $3, $4)
            RETURNING id, person_id, title, description, achieved_on, created_at
            "#,
        )
        .bind(person_id)
        .bind(title)
        .bind(description)
        .bind(achieved_on)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a milestone by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<MilestoneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_milestone_by_id");
        let result = sqlx::query_as::<_, MilestoneEntity>(
            r#"
            SELECT id, person_id, title, description, achieved_on, created_at
            FROM milestones
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A person's milestones, most recently achieved first.
    pub async fn list_for_person(
        &self,
        person_id: i64,
    ) -> Result<Vec<MilestoneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_milestones_for_person");
        let result = sqlx::query_as::<_, MilestoneEntity>(
            r#"
            SELECT id, person_id, title, description, achieved_on, created_at
            FROM milestones
            WHERE person_id = $1
            ORDER BY achieved_on DESC NULLS LAST, id DESC
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update to a milestone.
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
        achieved_on: Option<NaiveDate>,
    ) -> Result<Option<MilestoneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_milestone");
        let result = sqlx::query_as::<_, MilestoneEntity>(
            r#"
            UPDATE milestones
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                achieved_on = COALESCE($4, achieved_on)
            WHERE id = $1
            RETURNING id, person_id, title, description, achieved_on, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(achieved_on)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a milestone.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_milestone");
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
