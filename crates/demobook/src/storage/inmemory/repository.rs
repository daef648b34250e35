//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use demobook_core::booking::{AvailabilitySettings, Reservation, SlotKey, YearMonth};
use demobook_core::storage::{
    RepositoryError, ReservationRepository, Result, SettingsRepository,
};

/// In-memory storage backend for tests and local development.
///
/// Reservations are keyed by slot in a `BTreeMap`, so listing a month is
/// already in chronological order. Data is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    reservations: Arc<RwLock<BTreeMap<SlotKey, Reservation>>>,
    settings: Arc<RwLock<HashMap<YearMonth, AvailabilitySettings>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepository {
    async fn list_reservations(&self, month: YearMonth) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .values()
            .filter(|r| r.month == month)
            .cloned()
            .collect())
    }

    async fn create_reservation(&self, reservation: &Reservation) -> Result<()> {
        // Check and insert under one write guard.
        let mut reservations = self.reservations.write().await;
        let slot = reservation.slot();
        if reservations.contains_key(&slot) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Reservation",
                key: slot.sort_key(),
            });
        }
        reservations.insert(slot, reservation.clone());
        Ok(())
    }

    async fn delete_reservation(&self, slot: SlotKey) -> Result<()> {
        let mut reservations = self.reservations.write().await;
        reservations.remove(&slot);
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self, month: YearMonth) -> Result<Option<AvailabilitySettings>> {
        let settings = self.settings.read().await;
        Ok(settings.get(&month).cloned())
    }

    async fn put_settings(&self, settings: &AvailabilitySettings) -> Result<()> {
        let mut stored = self.settings.write().await;
        stored.insert(settings.month, settings.clone());
        Ok(())
    }
}
