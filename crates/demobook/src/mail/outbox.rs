use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use demobook_core::mail::{EmailMessage, MailError, Mailer};

/// Mailer that keeps every message in memory instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct OutboxMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages "sent" so far, oldest first.
    #[allow(dead_code)]
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }

        tracing::info!(
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            "Email recorded in outbox"
        );
        self.sent.lock().await.push(message.clone());

        Ok(None)
    }
}

/// Mailer whose every send fails.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FailingMailer;

#[cfg(test)]
#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<Option<String>, MailError> {
        Err(MailError::Unavailable("mail service is down".to_string()))
    }
}
