use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use demobook_core::auth::AuthError;
use demobook_core::booking::{booking_error_to_status_code, BookingError};
use demobook_core::storage::{repository_error_to_status_code, RepositoryError};

/// Error returned by every API handler.
///
/// Renders as `{"error": "<message>"}` with the status code of the wrapped
/// domain error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        let code = match self {
            ApiError::Booking(e) => booking_error_to_status_code(e),
            ApiError::Auth(_) => 401,
            ApiError::Repository(e) => repository_error_to_status_code(e),
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store internals stay in the logs.
        let message = if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "API error");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => "Storage unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            tracing::warn!(status = %status, error = %self, "API error");
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_slot_taken_is_conflict() {
        let (status, body) =
            body_json(BookingError::SlotTaken("2025-12-10#14:00".to_string()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "This slot is already booked: 2025-12-10#14:00");
    }

    #[tokio::test]
    async fn test_auth_errors_are_unauthorized() {
        let (status, body) = body_json(AuthError::TokenExpired.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token expired");
    }

    #[tokio::test]
    async fn test_store_errors_hide_details() {
        let (status, body) = body_json(
            RepositoryError::ConnectionFailed("dispatch failure: io error".to_string()).into(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Storage unavailable");

        let (status, body) =
            body_json(RepositoryError::QueryFailed("throughput".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = body_json(BookingError::MissingField("month").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "month is required");
    }
}
