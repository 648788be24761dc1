//! Daily survey dispatch background job.
//!
//! Wraps the survey dispatch service so the scheduler can run it once per
//! day; each pass targets occurrences that ended the prior UTC day.

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::config::SurveyConfig;
use crate::services::{EmailService, PgSurveyStore, SurveyDispatchService};

use super::scheduler::{Job, JobFrequency};

/// Background job that sends post-event survey emails.
pub struct SurveyDispatchJob {
    service: SurveyDispatchService,
}

impl SurveyDispatchJob {
    /// Create a new survey dispatch job.
    pub fn new(pool: PgPool, email_service: EmailService, config: SurveyConfig) -> Self {
        let service = SurveyDispatchService::new(
            Arc::new(PgSurveyStore::new(pool)),
            Arc::new(email_service),
            config,
        );
        Self { service }
    }
}

#[async_trait::async_trait]
impl Job for SurveyDispatchJob {
    fn name(&self) -> &'static str {
        "survey_dispatch"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    async fn execute(&self) -> Result<(), String> {
        let report = self
            .service
            .run(Utc::now())
            .await
            .map_err(|e| format!("Survey dispatch failed: {}", e))?;

        info!(
            events_processed = report.events_processed,
            total_emails_sent = report.total_emails_sent,
            "Survey dispatch run complete"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_job_frequency_is_daily() {
        let freq = JobFrequency::Daily;
        assert_eq!(freq.duration(), Duration::from_secs(86400));
    }
}
