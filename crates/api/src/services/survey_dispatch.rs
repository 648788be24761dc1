//! Survey dispatch: find occurrences that ended the prior UTC day, email
//! every non-cancelled registrant a survey link, and flip the per-occurrence
//! idempotency flag.
//!
//! Sends are at-least-attempted: the flag is set once fan-out completes even
//! if individual emails failed, so an occurrence is never surveyed twice.
//! Failed recipients are counted in the run report and logged, not retried
//! on later runs. Per-occurrence errors are isolated; only a failure to read
//! the candidate set aborts the run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use domain::models::survey::{DispatchRunReport, OccurrenceDispatchResult, SurveyRecipient};
use domain::services::{previous_utc_day, EmailMessage, Mailer};
use persistence::repositories::{EventRepository, RegistrationRepository};
use sqlx::PgPool;

use crate::config::SurveyConfig;

/// An occurrence eligible for survey dispatch.
#[derive(Debug, Clone)]
pub struct SurveyCandidate {
    pub occurrence_id: i64,
    pub title: String,
}

/// Storage port for the dispatch job.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Occurrences that ended inside the window, belong to a non-survey
    /// event, and have not had surveys sent.
    async fn candidates(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<SurveyCandidate>, sqlx::Error>;

    /// Recipients for one occurrence.
    async fn recipients(&self, occurrence_id: i64) -> Result<Vec<SurveyRecipient>, sqlx::Error>;

    /// Flip the idempotency flag.
    async fn mark_survey_sent(&self, occurrence_id: i64) -> Result<(), sqlx::Error>;
}

/// Postgres-backed survey store.
pub struct PgSurveyStore {
    events: EventRepository,
    registrations: RegistrationRepository,
}

impl PgSurveyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool),
        }
    }
}

#[async_trait]
impl SurveyStore for PgSurveyStore {
    async fn candidates(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<SurveyCandidate>, sqlx::Error> {
        let rows = self.events.survey_candidates(window_start, window_end).await?;
        Ok(rows
            .into_iter()
            .map(|r| SurveyCandidate {
                occurrence_id: r.occurrence_id,
                title: r.event_name,
            })
            .collect())
    }

    async fn recipients(&self, occurrence_id: i64) -> Result<Vec<SurveyRecipient>, sqlx::Error> {
        let rows = self.registrations.survey_recipients(occurrence_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_survey_sent(&self, occurrence_id: i64) -> Result<(), sqlx::Error> {
        self.events.mark_survey_sent(occurrence_id).await?;
        Ok(())
    }
}

/// Builds the survey email for one recipient.
pub fn build_survey_email(
    recipient: &SurveyRecipient,
    event_title: &str,
    app_url: &str,
) -> EmailMessage {
    let name = recipient.display_name();
    let attended_text = if recipient.attended {
        "attended"
    } else {
        "registered for"
    };
    let survey_url = format!("{}/surveys", app_url.trim_end_matches('/'));

    let subject = format!("Survey: {}", event_title);

    let body_text = format!(
        r#"Hi {name},

We hope you enjoyed {title}!

Your feedback is incredibly valuable to us. Please take a few minutes to complete our survey and help us improve our programs.

Take the survey: {url}

Thank you for being part of the Ella Rises community!

Best regards,
The Ella Rises Team"#,
        name = name,
        title = event_title,
        url = survey_url
    );

    let body_html = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: linear-gradient(135deg, #fcd5ce, #f8b4b4); padding: 30px; text-align: center; border-radius: 10px 10px 0 0;">
        <h1 style="color: white; margin: 0;">Ella Rises</h1>
    </div>
    <div style="background: #fff; padding: 30px; border: 1px solid #ddd; border-top: none;">
        <h2>Thank you for {attended} our event!</h2>
        <p>Hi {name},</p>
        <p>We hope you enjoyed <strong>{title}</strong>!</p>
        <p>Your feedback is incredibly valuable to us. Please take a few minutes to complete our survey and help us improve our programs.</p>
        <p style="text-align: center;">
            <a href="{url}" style="display: inline-block; padding: 12px 30px; background: #e8998d; color: white; text-decoration: none; border-radius: 5px;">Take Survey</a>
        </p>
        <p>Or visit: <a href="{url}">{url}</a></p>
        <p>Thank you for being part of the Ella Rises community!</p>
        <p>Best regards,<br>The Ella Rises Team</p>
    </div>
    <div style="text-align: center; padding: 20px; color: #666; font-size: 12px;">
        <p>This email was sent because you {attended} an Ella Rises event.</p>
    </div>
</body>
</html>"#,
        attended = attended_text,
        name = name,
        title = event_title,
        url = survey_url
    );

    EmailMessage {
        to: recipient.email.clone(),
        to_name: Some(name),
        subject,
        body_text,
        body_html: Some(body_html),
    }
}

/// The survey dispatch service.
pub struct SurveyDispatchService {
    store: Arc<dyn SurveyStore>,
    mailer: Arc<dyn Mailer>,
    config: SurveyConfig,
}

impl SurveyDispatchService {
    pub fn new(store: Arc<dyn SurveyStore>, mailer: Arc<dyn Mailer>, config: SurveyConfig) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }

    /// Run one dispatch pass relative to `now`.
    ///
    /// Fails only when the candidate set cannot be read; everything after
    /// that is isolated per occurrence.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<DispatchRunReport, sqlx::Error> {
        let (window_start, window_end) = previous_utc_day(now);
        info!(
            window_start = %window_start,
            window_end = %window_end,
            "Scanning for occurrences needing surveys"
        );

        let candidates = self.store.candidates(window_start, window_end).await?;
        info!(count = candidates.len(), "Survey candidates found");

        let mut results = Vec::with_capacity(candidates.len());
        let mut total_sent = 0;

        for candidate in &candidates {
            match self.process_occurrence(candidate).await {
                Ok(result) => {
                    total_sent += result.sent;
                    results.push(result);
                }
                Err(e) => {
                    error!(
                        occurrence_id = candidate.occurrence_id,
                        error = %e,
                        "Failed to process occurrence; continuing with the rest"
                    );
                    results.push(OccurrenceDispatchResult {
                        occurrence_id: candidate.occurrence_id,
                        title: candidate.title.clone(),
                        recipients: 0,
                        sent: 0,
                        failed: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(DispatchRunReport {
            events_processed: results.len(),
            total_emails_sent: total_sent,
            results,
        })
    }

    async fn process_occurrence(
        &self,
        candidate: &SurveyCandidate,
    ) -> Result<OccurrenceDispatchResult, sqlx::Error> {
        let recipients = self.store.recipients(candidate.occurrence_id).await?;

        if recipients.is_empty() {
            // Flip the flag anyway so the occurrence is never re-checked.
            self.store.mark_survey_sent(candidate.occurrence_id).await?;
            info!(
                occurrence_id = candidate.occurrence_id,
                title = %candidate.title,
                "No recipients; marked as surveyed"
            );
            return Ok(OccurrenceDispatchResult {
                occurrence_id: candidate.occurrence_id,
                title: candidate.title.clone(),
                recipients: 0,
                sent: 0,
                failed: 0,
                error: None,
            });
        }

        let sends: Vec<_> = recipients
            .iter()
            .map(|recipient| self.send_with_retry(candidate, recipient))
            .collect();
        let outcomes: Vec<bool> = stream::iter(sends)
            .buffer_unordered(self.config.fan_out_limit)
            .collect()
            .await;

        let sent = outcomes.iter().filter(|ok| **ok).count();
        let failed = outcomes.len() - sent;

        // The flag flips regardless of individual failures so recipients are
        // never surveyed twice for the same occurrence.
        self.store.mark_survey_sent(candidate.occurrence_id).await?;

        info!(
            occurrence_id = candidate.occurrence_id,
            title = %candidate.title,
            recipients = recipients.len(),
            sent = sent,
            failed = failed,
            "Occurrence surveyed"
        );

        Ok(OccurrenceDispatchResult {
            occurrence_id: candidate.occurrence_id,
            title: candidate.title.clone(),
            recipients: recipients.len(),
            sent,
            failed,
            error: None,
        })
    }

    /// Send one survey email with a per-send timeout and bounded retry on
    /// transient failures. Returns whether the send ultimately succeeded.
    async fn send_with_retry(&self, candidate: &SurveyCandidate, recipient: &SurveyRecipient) -> bool {
        let message = build_survey_email(recipient, &candidate.title, &self.config.app_url);
        let send_timeout = Duration::from_secs(self.config.send_timeout_secs);

        for attempt in 0..=self.config.send_retries {
            match tokio::time::timeout(send_timeout, self.mailer.send(&message)).await {
                Ok(Ok(message_id)) => {
                    info!(
                        to = %recipient.email,
                        message_id = %message_id,
                        "Survey email sent"
                    );
                    return true;
                }
                Ok(Err(e)) if e.is_retryable() && attempt < self.config.send_retries => {
                    warn!(
                        to = %recipient.email,
                        attempt = attempt + 1,
                        error = %e,
                        "Survey email failed; retrying"
                    );
                }
                Ok(Err(e)) => {
                    warn!(to = %recipient.email, error = %e, "Survey email failed");
                    return false;
                }
                Err(_) if attempt < self.config.send_retries => {
                    warn!(
                        to = %recipient.email,
                        attempt = attempt + 1,
                        "Survey email timed out; retrying"
                    );
                }
                Err(_) => {
                    warn!(to = %recipient.email, "Survey email timed out");
                    return false;
                }
            }

            tokio::time::sleep(Duration::from_millis(250 * (attempt as u64 + 1))).await;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::services::MockMailer;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    struct FakeStore {
        candidates: Vec<SurveyCandidate>,
        recipients: HashMap<i64, Vec<SurveyRecipient>>,
        recipient_errors: HashSet<i64>,
        candidates_fail: bool,
        marked: Mutex<Vec<i64>>,
    }

    impl FakeStore {
        fn new(candidates: Vec<SurveyCandidate>) -> Self {
            Self {
                candidates,
                recipients: HashMap::new(),
                recipient_errors: HashSet::new(),
                candidates_fail: false,
                marked: Mutex::new(Vec::new()),
            }
        }

        fn marked_ids(&self) -> Vec<i64> {
            self.marked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SurveyStore for FakeStore {
        async fn candidates(
            &self,
            _window_start: DateTime<Utc>,
            _window_end: DateTime<Utc>,
        ) -> Result<Vec<SurveyCandidate>, sqlx::Error> {
            if self.candidates_fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self.candidates.clone())
        }

        async fn recipients(
            &self,
            occurrence_id: i64,
        ) -> Result<Vec<SurveyRecipient>, sqlx::Error> {
            if self.recipient_errors.contains(&occurrence_id) {
                return Err(sqlx::Error::Protocol("recipient query failed".into()));
            }
            Ok(self.recipients.get(&occurrence_id).cloned().unwrap_or_default())
        }

        async fn mark_survey_sent(&self, occurrence_id: i64) -> Result<(), sqlx::Error> {
            self.marked.lock().unwrap().push(occurrence_id);
            Ok(())
        }
    }

    fn candidate(id: i64, title: &str) -> SurveyCandidate {
        SurveyCandidate {
            occurrence_id: id,
            title: title.to_string(),
        }
    }

    fn recipient(email: &str, attended: bool) -> SurveyRecipient {
        SurveyRecipient {
            person_id: 1,
            email: email.to_string(),
            first_name: "Amina".to_string(),
            last_name: "Flores".to_string(),
            attended,
        }
    }

    fn test_config() -> SurveyConfig {
        SurveyConfig {
            app_url: "https://ellarises.org".to_string(),
            fan_out_limit: 4,
            send_timeout_secs: 2,
            send_retries: 0,
        }
    }

    fn run_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap()
    }

    fn service(store: FakeStore, mailer: MockMailer) -> (SurveyDispatchService, Arc<FakeStore>, Arc<MockMailer>) {
        let store = Arc::new(store);
        let mailer = Arc::new(mailer);
        let service = SurveyDispatchService::new(store.clone(), mailer.clone(), test_config());
        (service, store, mailer)
    }

    #[tokio::test]
    async fn test_zero_recipients_marks_sent_without_sending() {
        let store = FakeStore::new(vec![candidate(11, "College Night")]);
        let (service, store, mailer) = service(store, MockMailer::new());

        let report = service.run(run_time()).await.unwrap();

        assert_eq!(report.events_processed, 1);
        assert_eq!(report.total_emails_sent, 0);
        assert_eq!(report.results[0].recipients, 0);
        assert!(report.results[0].error.is_none());
        assert_eq!(store.marked_ids(), vec![11]);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_counts_and_flag() {
        let mut store = FakeStore::new(vec![candidate(11, "College Night")]);
        store.recipients.insert(
            11,
            vec![
                recipient("a@example.org", true),
                recipient("b@example.org", false),
                recipient("bounce@example.org", true),
            ],
        );
        let mailer = MockMailer::failing(["bounce@example.org".to_string()]);
        let (service, store, mailer) = service(store, mailer);

        let report = service.run(run_time()).await.unwrap();

        assert_eq!(report.events_processed, 1);
        assert_eq!(report.total_emails_sent, 2);
        let result = &report.results[0];
        assert_eq!(result.recipients, 3);
        assert_eq!(result.sent, 2);
        assert_eq!(result.failed, 1);
        // The idempotency flag flips even with partial failures.
        assert_eq!(store.marked_ids(), vec![11]);
        assert_eq!(mailer.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_per_occurrence_error_does_not_abort_run() {
        let mut store = FakeStore::new(vec![
            candidate(11, "College Night"),
            candidate(12, "Mentor Social"),
        ]);
        store.recipient_errors.insert(11);
        store
            .recipients
            .insert(12, vec![recipient("a@example.org", true)]);
        let (service, store, _mailer) = service(store, MockMailer::new());

        let report = service.run(run_time()).await.unwrap();

        assert_eq!(report.events_processed, 2);
        assert_eq!(report.total_emails_sent, 1);
        assert!(report.results[0].error.is_some());
        assert!(report.results[1].error.is_none());
        // The failed occurrence keeps its flag unset for the next run.
        assert_eq!(store.marked_ids(), vec![12]);
    }

    #[tokio::test]
    async fn test_candidate_query_failure_aborts_run() {
        let mut store = FakeStore::new(vec![]);
        store.candidates_fail = true;
        let (service, _store, _mailer) = service(store, MockMailer::new());

        let result = service.run(run_time()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_multiple_occurrences_aggregate_totals() {
        let mut store = FakeStore::new(vec![
            candidate(11, "College Night"),
            candidate(12, "Mentor Social"),
        ]);
        store.recipients.insert(
            11,
            vec![recipient("a@example.org", true), recipient("b@example.org", true)],
        );
        store
            .recipients
            .insert(12, vec![recipient("c@example.org", false)]);
        let (service, store, mailer) = service(store, MockMailer::new());

        let report = service.run(run_time()).await.unwrap();

        assert_eq!(report.events_processed, 2);
        assert_eq!(report.total_emails_sent, 3);
        assert_eq!(store.marked_ids(), vec![11, 12]);
        assert_eq!(mailer.sent_count(), 3);
    }

    #[test]
    fn test_survey_email_copy_varies_by_attendance() {
        let attended = build_survey_email(
            &recipient("a@example.org", true),
            "College Night",
            "https://ellarises.org",
        );
        let registered = build_survey_email(
            &recipient("a@example.org", false),
            "College Night",
            "https://ellarises.org",
        );

        assert_eq!(attended.subject, "Survey: College Night");
        assert!(attended.body_html.as_deref().unwrap().contains("attended our event"));
        assert!(registered
            .body_html
            .as_deref()
            .unwrap()
            .contains("registered for our event"));
        assert!(attended.body_text.contains("https://ellarises.org/surveys"));
    }

    #[test]
    fn test_survey_email_link_handles_trailing_slash() {
        let message = build_survey_email(
            &recipient("a@example.org", true),
            "College Night",
            "https://ellarises.org/",
        );
        assert!(message.body_text.contains("https://ellarises.org/surveys"));
        assert!(!message.body_text.contains("org//surveys"));
    }
}
