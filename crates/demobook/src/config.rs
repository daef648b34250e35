use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table holding reservations and settings (default: "demos")
    pub table_name: String,
    /// Admin password. Unset means every admin login is refused.
    pub admin_password: Option<String>,
    /// HS256 secret for admin tokens. Unset means a random per-process secret.
    pub token_secret: Option<String>,
    /// Admin token lifetime in seconds (default: 28,800 = 8 hours)
    pub token_ttl_seconds: u64,
    /// Sender address of every outgoing email (default: "bookings@demobook.dev")
    pub mail_sender: String,
    /// Recipient of new-booking notifications (default: the sender)
    pub mail_owner: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "demos")
    /// - `ADMIN_PASSWORD` - Admin password (no default)
    /// - `ADMIN_TOKEN_SECRET` - Token signing secret (default: random per process)
    /// - `ADMIN_TOKEN_TTL_SECONDS` - Token lifetime (default: 28,800)
    /// - `MAIL_SENDER` - Sender address (default: "bookings@demobook.dev")
    /// - `MAIL_OWNER` - Owner notification address (default: `MAIL_SENDER`)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        let mail_sender =
            non_empty_var("MAIL_SENDER").unwrap_or_else(|| "bookings@demobook.dev".to_string());

        Self {
            table_name: non_empty_var("DYNAMODB_TABLE_NAME").unwrap_or_else(|| "demos".to_string()),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            token_secret: non_empty_var("ADMIN_TOKEN_SECRET"),
            token_ttl_seconds: env::var("ADMIN_TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(28_800),
            mail_owner: non_empty_var("MAIL_OWNER").unwrap_or_else(|| mail_sender.clone()),
            mail_sender,
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the admin token lifetime as a chrono Duration.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.token_ttl_seconds).unwrap_or(i64::MAX / 1_000))
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for tests, independent of the environment.
    pub fn for_tests() -> Self {
        Self {
            table_name: "demos-test".to_string(),
            admin_password: Some("letmein".to_string()),
            token_secret: Some("test-secret".to_string()),
            token_ttl_seconds: 3_600,
            mail_sender: "bookings@demobook.dev".to_string(),
            mail_owner: "owner@demobook.dev".to_string(),
            request_timeout_seconds: 10,
        }
    }
}
