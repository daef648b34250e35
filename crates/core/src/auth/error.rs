use thiserror::Error;

/// Admin authentication failures. All of them surface as 401.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Admin login is not configured")]
    NotConfigured,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,
}
