//! Email service implementing the mailer port.
//!
//! Supported providers:
//! - `console`: logs emails (development)
//! - `smtp`: SMTP relay (logged stub until a full SMTP client lands)
//! - `sendgrid`: SendGrid v3 API via HTTP

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use domain::services::{EmailMessage, Mailer, MailerError};

use crate::config::EmailConfig;

/// HTTP timeout for provider API calls, in seconds.
const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Email service for transactional and survey email.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Check if email sending is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Console provider - logs the email instead of sending it.
    async fn send_console(&self, message: &EmailMessage) -> Result<String, MailerError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );
        debug!(body_text = %message.body_text, "Email body (plain text)");

        Ok(format!("console-{}", Uuid::new_v4()))
    }

    /// SMTP provider - relays via the configured SMTP server.
    async fn send_smtp(&self, message: &EmailMessage) -> Result<String, MailerError> {
        if self.config.smtp_host.is_empty() {
            return Err(MailerError::NotConfigured);
        }

        // A raw SMTP session needs a dedicated client; until one lands the
        // provider logs what it would send rather than failing the job.
        warn!(
            provider = "smtp",
            host = %self.config.smtp_host,
            port = %self.config.smtp_port,
            to = %message.to,
            subject = %message.subject,
            "SMTP provider configured; logging message instead of delivering"
        );

        Ok(format!("smtp-{}", Uuid::new_v4()))
    }

    /// SendGrid provider - sends via the v3 mail API.
    async fn send_sendgrid(&self, message: &EmailMessage) -> Result<String, MailerError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(MailerError::NotConfigured);
        }

        let mut to = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            to["name"] = serde_json::json!(name);
        }

        let mut content = vec![serde_json::json!({
            "type": "text/plain",
            "value": message.body_text
        })];
        if let Some(html) = &message.body_html {
            content.push(serde_json::json!({
                "type": "text/html",
                "value": html
            }));
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [to] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": content
        });

        let response = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailerError::Timeout
                } else {
                    MailerError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(status = %status, detail = %detail, "SendGrid rejected message");
            return Err(MailerError::Transport(format!(
                "SendGrid returned {}",
                status
            )));
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("sendgrid-{}", Uuid::new_v4()));

        Ok(message_id)
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok("disabled".to_string());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(MailerError::NotConfigured)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "amina@example.org".to_string(),
            to_name: Some("Amina Flores".to_string()),
            subject: "Survey: College Night".to_string(),
            body_text: "Tell us how it went".to_string(),
            body_html: None,
        }
    }

    #[tokio::test]
    async fn test_disabled_service_skips_send() {
        let service = EmailService::new(EmailConfig::default());
        let id = service.send(&message()).await.unwrap();
        assert_eq!(id, "disabled");
    }

    #[tokio::test]
    async fn test_console_provider_returns_message_id() {
        let config = EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        let id = service.send(&message()).await.unwrap();
        assert!(id.starts_with("console-"));
    }

    #[tokio::test]
    async fn test_unknown_provider_not_configured() {
        let config = EmailConfig {
            enabled: true,
            provider: "carrier-pigeon".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        let result = service.send(&message()).await;
        assert!(matches!(result, Err(MailerError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_not_configured() {
        let config = EmailConfig {
            enabled: true,
            provider: "sendgrid".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        let result = service.send(&message()).await;
        assert!(matches!(result, Err(MailerError::NotConfigured)));
    }
}
