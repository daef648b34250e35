//! Application state.
//!
//! Shared, cheaply cloneable state handed to every request handler. Storage
//! and mail are trait objects so the backends selected by feature flags (or
//! test doubles) plug in without touching the handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use demobook_core::mail::Mailer;
use demobook_core::storage::{ReservationRepository, SettingsRepository};

use crate::{auth::AdminAuth, config::Config};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<dyn ReservationRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub auth: AdminAuth,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for AdminAuth {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        settings: Arc<dyn SettingsRepository>,
        mailer: Arc<dyn Mailer>,
        config: Config,
    ) -> Self {
        Self {
            reservations,
            settings,
            mailer,
            auth: AdminAuth::from_config(&config),
            config: Arc::new(config),
        }
    }

    /// Build the state with the storage and mail backends selected at compile time.
    pub async fn from_config(config: Config) -> Self {
        let (reservations, settings) = storage_backend(&config).await;
        let mailer = mail_backend().await;
        Self::new(reservations, settings, mailer, config)
    }
}

type Repositories = (Arc<dyn ReservationRepository>, Arc<dyn SettingsRepository>);

#[cfg(feature = "inmemory")]
async fn storage_backend(_config: &Config) -> Repositories {
    use crate::storage::InMemoryRepository;

    tracing::info!("Using in-memory storage");
    let repo = Arc::new(InMemoryRepository::new());
    (repo.clone(), repo)
}

#[cfg(feature = "dynamodb")]
async fn storage_backend(config: &Config) -> Repositories {
    use crate::storage::DynamoDbRepository;

    tracing::info!(table = %config.table_name, "Using DynamoDB storage");
    let repo = Arc::new(DynamoDbRepository::from_table_name(&config.table_name).await);
    (repo.clone(), repo)
}

#[cfg(feature = "outbox")]
async fn mail_backend() -> Arc<dyn Mailer> {
    tracing::info!("Using outbox mailer; emails are logged, not delivered");
    Arc::new(crate::mail::OutboxMailer::new())
}

#[cfg(feature = "ses")]
async fn mail_backend() -> Arc<dyn Mailer> {
    tracing::info!("Using SES mailer");
    Arc::new(crate::mail::SesMailer::from_env().await)
}

#[cfg(test)]
impl AppState {
    /// In-memory state with the given mailer and the fixed test config.
    pub fn for_tests(mailer: Arc<dyn Mailer>) -> Self {
        let repo = Arc::new(crate::storage::InMemoryRepository::new());
        Self::new(repo.clone(), repo, mailer, Config::for_tests())
    }
}
