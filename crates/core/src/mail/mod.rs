//! Booking notification emails.
//!
//! Message building is pure; delivery goes through the [`Mailer`] trait so
//! the service can swap SES for an in-process outbox.

mod error;
mod messages;
mod traits;

pub use error::MailError;
pub use messages::{client_confirmation, owner_notification, EmailMessage};
pub use traits::Mailer;
