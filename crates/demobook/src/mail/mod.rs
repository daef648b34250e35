//! Outbound mail backends implementing `demobook_core::mail::Mailer`.
//!
//! - `outbox` (default): records messages in memory and logs them
//! - `ses`: Amazon SES v2
//!
//! These features are mutually exclusive.

#[cfg(all(feature = "outbox", feature = "ses"))]
compile_error!("Features 'outbox' and 'ses' are mutually exclusive. Enable only one mail backend.");

#[cfg(not(any(feature = "outbox", feature = "ses")))]
compile_error!("No mail backend selected. Enable 'outbox' or 'ses' feature.");

#[cfg(any(feature = "outbox", test))]
mod outbox;
#[cfg(feature = "ses")]
mod ses;

#[cfg(any(feature = "outbox", test))]
pub use outbox::OutboxMailer;
#[cfg(test)]
pub use outbox::FailingMailer;
#[cfg(feature = "ses")]
pub use ses::SesMailer;
