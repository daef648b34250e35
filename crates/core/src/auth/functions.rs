use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::AdminClaims;

/// Generate a random signing secret for admin tokens.
///
/// Used when no secret is configured; tokens then only verify on the
/// process that issued them.
pub fn generate_token_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Compare a submitted password with the configured one in constant time
/// with respect to the position of the first differing byte.
pub fn passwords_match(candidate: &str, expected: &str) -> bool {
    let a = candidate.as_bytes();
    let b = expected.as_bytes();

    let mut diff = a.len() ^ b.len();
    for (i, byte) in b.iter().enumerate() {
        let other = a.get(i).copied().unwrap_or(0);
        diff |= usize::from(byte ^ other);
    }
    diff == 0
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .or_else(|| header_value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Check if a token's claims have expired.
pub fn is_expired(claims: &AdminClaims, now: DateTime<Utc>) -> bool {
    claims.exp <= now.timestamp()
}

/// Calculate token expiry from issue time and TTL.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}
