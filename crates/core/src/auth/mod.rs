mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{
    bearer_token, calculate_expiry, generate_token_secret, is_expired, passwords_match,
};
pub use types::{AdminClaims, ADMIN_SUBJECT};
