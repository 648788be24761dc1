//! Mailer port for outbound notification email.
//!
//! The survey dispatch job and auth flows send mail through this trait so
//! the transport (SMTP relay, SendGrid, console) stays swappable and tests
//! can record sends instead of performing them.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;

/// An email to be delivered.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
    /// HTML body (optional)
    pub body_html: Option<String>,
}

/// Errors that can occur while sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Send timed out")]
    Timeout,

    #[error("Email service not configured")]
    NotConfigured,
}

impl MailerError {
    /// Transient failures are worth retrying; bad addresses and
    /// misconfiguration are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MailerError::Transport(_) | MailerError::Timeout)
    }
}

/// Outbound email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message, returning the transport's message id.
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError>;
}

/// Recording mailer for tests: stores every message and fails addresses on a
/// deny list with a transport error.
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub failing_addresses: HashSet<String>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(addresses: impl IntoIterator<Item = String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_addresses: addresses.into_iter().collect(),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer mutex poisoned").len()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError> {
        if self.failing_addresses.contains(&message.to) {
            return Err(MailerError::Transport("simulated transport failure".to_string()));
        }
        let mut sent = self.sent.lock().expect("mailer mutex poisoned");
        sent.push(message.clone());
        Ok(format!("mock-{}", sent.len()))
    }
}
