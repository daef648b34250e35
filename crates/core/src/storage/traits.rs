use async_trait::async_trait;

use crate::booking::{AvailabilitySettings, Reservation, SlotKey, YearMonth};

use super::Result;

/// Repository for reservation records (`BOOKINGS#<month>` partitions).
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Gets all reservations of a month, ordered by slot (chronological).
    async fn list_reservations(&self, month: YearMonth) -> Result<Vec<Reservation>>;

    /// Creates a reservation if its slot is free.
    ///
    /// The existence check and the write must be one atomic operation:
    /// when two callers race for the same slot exactly one succeeds and the
    /// other gets `RepositoryError::AlreadyExists`.
    async fn create_reservation(&self, reservation: &Reservation) -> Result<()>;

    /// Deletes the reservation at a slot. Deleting a free slot is not an error.
    async fn delete_reservation(&self, slot: SlotKey) -> Result<()>;
}

/// Repository for per-month availability settings (`SETTINGS#<month>` partitions).
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Gets the settings of a month. `None` means the month is unconfigured.
    async fn get_settings(&self, month: YearMonth) -> Result<Option<AvailabilitySettings>>;

    /// Replaces the settings of a month in a single write.
    async fn put_settings(&self, settings: &AvailabilitySettings) -> Result<()>;
}
