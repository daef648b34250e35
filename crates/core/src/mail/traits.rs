use async_trait::async_trait;

use super::{EmailMessage, MailError};

/// Outbound mail service.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message. Returns the provider message id when there is one.
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, MailError>;
}
