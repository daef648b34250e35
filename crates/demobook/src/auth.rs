//! Admin authentication: password login issuing short-lived signed tokens,
//! and the extractor that guards `/api/admin/*`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use demobook_core::auth::{
    bearer_token, calculate_expiry, generate_token_secret, is_expired, passwords_match,
    AdminClaims, AuthError,
};

use crate::{config::Config, handlers::ApiError};

/// A freshly issued admin token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

struct AdminAuthInner {
    password: Option<String>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

/// Issues and verifies admin tokens. Cheap to clone.
#[derive(Clone)]
pub struct AdminAuth {
    inner: Arc<AdminAuthInner>,
}

impl AdminAuth {
    pub fn new(password: Option<String>, secret: &str, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(AdminAuthInner {
                password,
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                ttl,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        if config.admin_password.is_none() {
            tracing::warn!("ADMIN_PASSWORD is not set; admin login is disabled");
        }

        let secret = match &config.token_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!(
                    "ADMIN_TOKEN_SECRET is not set; using a random secret, tokens will not survive a restart"
                );
                generate_token_secret()
            }
        };

        Self::new(config.admin_password.clone(), &secret, config.token_ttl())
    }

    /// Check the password and issue a token valid for the configured TTL.
    pub fn login(&self, candidate: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expected = self
            .inner
            .password
            .as_deref()
            .ok_or(AuthError::NotConfigured)?;

        if !passwords_match(candidate, expected) {
            return Err(AuthError::InvalidCredentials);
        }

        let expires_at = calculate_expiry(now, self.inner.ttl);
        let claims = AdminClaims::new(now, expires_at);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.inner.encoding_key,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature, expiry and subject.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AdminClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<AdminClaims>(token, &self.inner.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?
            .claims;

        if is_expired(&claims, now) {
            return Err(AuthError::TokenExpired);
        }
        if !claims.is_admin() {
            return Err(AuthError::InvalidToken("unexpected subject".to_string()));
        }

        Ok(claims)
    }
}

/// Extractor for an authenticated admin. Rejects with 401.
pub struct AdminSession(pub AdminClaims);

impl<S> FromRequestParts<S> for AdminSession
where
    AdminAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AdminAuth::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken("invalid authorization header".to_string()))?;

        let token = bearer_token(header_value).ok_or(AuthError::MissingToken)?;
        let claims = auth.verify(token, Utc::now())?;

        Ok(AdminSession(claims))
    }
}
