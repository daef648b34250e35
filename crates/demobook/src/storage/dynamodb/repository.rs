//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `demobook_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use demobook_core::booking::{AvailabilitySettings, Reservation, SlotKey, YearMonth};
use demobook_core::storage::{ReservationRepository, Result, SettingsRepository};

use super::conversions::{
    item_to_reservation, item_to_settings, reservation_to_item, settings_to_item,
};
use super::error::{map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error};
use super::keys;

/// DynamoDB-based repository implementation.
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a repository using the AWS SDK default credential chain.
    pub async fn from_table_name(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table_name)
    }
}

// ============================================================================
// ReservationRepository implementation
// ============================================================================

#[async_trait]
impl ReservationRepository for DynamoDbRepository {
    async fn list_reservations(&self, month: YearMonth) -> Result<Vec<Reservation>> {
        let mut reservations = Vec::new();
        let mut start_key = None;

        // SK is `<date>#<time>`, so DynamoDB's ascending order is chronological.
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk")
                .expression_attribute_values(":pk", AttributeValue::S(keys::bookings_pk(month)))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_query_error)?;

            for item in output.items.unwrap_or_default() {
                reservations.push(item_to_reservation(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(reservations)
    }

    async fn create_reservation(&self, reservation: &Reservation) -> Result<()> {
        let item = reservation_to_item(reservation)?;
        let slot = reservation.slot();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Reservation", keys::reservation_sk(&slot)))?;

        Ok(())
    }

    async fn delete_reservation(&self, slot: SlotKey) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(keys::bookings_pk(slot.month())))
            .key("SK", AttributeValue::S(keys::reservation_sk(&slot)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}

// ============================================================================
// SettingsRepository implementation
// ============================================================================

#[async_trait]
impl SettingsRepository for DynamoDbRepository {
    async fn get_settings(&self, month: YearMonth) -> Result<Option<AvailabilitySettings>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(keys::settings_pk(month)))
            .key("SK", AttributeValue::S(keys::SETTINGS_SK.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_settings(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_settings(&self, settings: &AvailabilitySettings) -> Result<()> {
        let item = settings_to_item(settings)?;
        let key = keys::display_key(&keys::settings_pk(settings.month), keys::SETTINGS_SK);

        // Unconditional put: replaces the previous record in one write.
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "AvailabilitySettings", key))?;

        Ok(())
    }
}
