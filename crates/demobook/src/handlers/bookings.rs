//! Public booking endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use demobook_core::booking::{
    is_slot_offered, BookDemoRequest, BookingError, Reservation, DATE_FORMAT,
};
use demobook_core::mail::{client_confirmation, owner_notification, EmailMessage, MailError};
use demobook_core::serde::format_time;
use demobook_core::storage::RepositoryError;

use super::{today, ApiError};
use crate::state::AppState;

/// Response body of a successful booking.
#[derive(Debug, Serialize)]
pub struct BookDemoResponse {
    pub success: bool,
    pub booking_id: Uuid,
    pub message: String,
    pub date: String,
    pub time: String,
}

/// POST /api/book-demo
///
/// Validates the request, checks the slot against the month's settings and
/// creates the reservation with a create-if-absent write. Emails are sent
/// after the write; their failure does not undo the booking.
#[axum::debug_handler]
pub async fn book_demo(
    State(state): State<AppState>,
    payload: Result<Json<BookDemoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookDemoResponse>), ApiError> {
    let Json(request) = payload?;
    let reservation = request.into_reservation()?;
    let slot = reservation.slot();

    let settings = state.settings.get_settings(reservation.month).await?;
    if !is_slot_offered(settings.as_ref(), &slot, today()) {
        return Err(BookingError::SlotUnavailable(slot.to_string()).into());
    }

    match state.reservations.create_reservation(&reservation).await {
        Ok(()) => {}
        Err(RepositoryError::AlreadyExists { .. }) => {
            return Err(BookingError::SlotTaken(slot.to_string()).into());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        booking_id = %reservation.id,
        month = %reservation.month,
        slot = %slot,
        "Demo booked"
    );

    send_booking_emails(&state, &reservation).await;

    Ok((
        StatusCode::CREATED,
        Json(BookDemoResponse {
            success: true,
            booking_id: reservation.id,
            message: "Demo booked successfully".to_string(),
            date: reservation.date.format(DATE_FORMAT).to_string(),
            time: format_time(reservation.time),
        }),
    ))
}

/// Owner notification, then client confirmation. Failures are only logged.
async fn send_booking_emails(state: &AppState, reservation: &Reservation) {
    let config = &state.config;
    let messages = [
        (
            "owner notification",
            owner_notification(reservation, &config.mail_sender, &config.mail_owner),
        ),
        (
            "client confirmation",
            client_confirmation(reservation, &config.mail_sender),
        ),
    ];

    for (kind, message) in messages {
        send_logged(state, reservation, kind, message).await;
    }
}

async fn send_logged(
    state: &AppState,
    reservation: &Reservation,
    kind: &str,
    message: Result<EmailMessage, MailError>,
) {
    let sent = match message {
        Ok(message) => state.mailer.send(&message).await,
        Err(e) => Err(e),
    };

    match sent {
        Ok(message_id) => tracing::debug!(
            booking_id = %reservation.id,
            kind,
            message_id = message_id.as_deref().unwrap_or("-"),
            "Email sent"
        ),
        Err(e) => tracing::warn!(
            booking_id = %reservation.id,
            kind,
            error = %e,
            "Failed to send email"
        ),
    }
}
