use thiserror::Error;

/// Failures while handing a message to the mail service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("Failed to render message: {0}")]
    Render(String),
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Mail service rejected the message: {0}")]
    Rejected(String),
    #[error("Mail service unavailable: {0}")]
    Unavailable(String),
}
