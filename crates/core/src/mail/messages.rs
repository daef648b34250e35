use askama::Template;
use serde::Serialize;

use super::error::MailError;
use crate::booking::{Reservation, DATE_FORMAT};
use crate::serde::format_time;

/// Length of a demo as announced to the client.
const DEMO_DURATION_MINUTES: u32 = 30;

const NOT_SPECIFIED: &str = "Not specified";

/// A rendered HTML email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Template)]
#[template(path = "email/owner_notification.html")]
struct OwnerNotificationTemplate<'a> {
    name: &'a str,
    email: &'a str,
    profile_type: &'a str,
    offer: &'a str,
    long_date: String,
    time: String,
    /// Pretty-printed answers, empty when the form had none.
    answers: String,
}

#[derive(Template)]
#[template(path = "email/client_confirmation.html")]
struct ClientConfirmationTemplate<'a> {
    name: &'a str,
    long_date: String,
    time: String,
    duration: u32,
}

/// Human readable date, e.g. `Wednesday 10 December 2025`.
fn long_date(reservation: &Reservation) -> String {
    reservation.date.format("%A %d %B %Y").to_string()
}

fn render(template: &impl Template) -> Result<String, MailError> {
    template
        .render()
        .map_err(|e| MailError::Render(e.to_string()))
}

/// Notification to the owner that a demo was booked.
pub fn owner_notification(
    reservation: &Reservation,
    from: &str,
    owner: &str,
) -> Result<EmailMessage, MailError> {
    let date = reservation.date.format(DATE_FORMAT).to_string();
    let time = format_time(reservation.time);

    let answers = if reservation.answers.is_empty() {
        String::new()
    } else {
        serde_json::to_string_pretty(&reservation.answers)
            .map_err(|e| MailError::Render(e.to_string()))?
    };

    let html = render(&OwnerNotificationTemplate {
        name: &reservation.name,
        email: &reservation.email,
        profile_type: reservation.profile_type.as_deref().unwrap_or(NOT_SPECIFIED),
        offer: reservation.offer.as_deref().unwrap_or(NOT_SPECIFIED),
        long_date: long_date(reservation),
        time: time.clone(),
        answers,
    })?;

    Ok(EmailMessage {
        from: from.to_string(),
        to: vec![owner.to_string()],
        subject: format!("New demo booked: {} - {date} at {time}", reservation.name),
        html,
    })
}

/// Confirmation sent to the person who booked.
pub fn client_confirmation(reservation: &Reservation, from: &str) -> Result<EmailMessage, MailError> {
    let html = render(&ClientConfirmationTemplate {
        name: &reservation.name,
        long_date: long_date(reservation),
        time: format_time(reservation.time),
        duration: DEMO_DURATION_MINUTES,
    })?;

    Ok(EmailMessage {
        from: from.to_string(),
        to: vec![reservation.email.clone()],
        subject: "Your demo is confirmed".to_string(),
        html,
    })
}
