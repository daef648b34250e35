use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subject of every admin token; there is a single admin principal.
pub const ADMIN_SUBJECT: &str = "admin";

/// Claims carried by a signed admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl AdminClaims {
    pub fn new(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: ADMIN_SUBJECT.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.sub == ADMIN_SUBJECT
    }
}
