//! Storage port — repository traits for persistence.

use std::future::Future;
use std::sync::Arc;

use feederhub_domain::device::{Device, Mac};
use feederhub_domain::error::FeederError;
use feederhub_domain::history::HistoryEntry;
use feederhub_domain::id::{DeviceId, ProductId, UserId};

/// Repository for persisting and querying [`Device`]s.
///
/// Implementations must enforce MAC uniqueness themselves (a unique index or
/// equivalent): two concurrent `create` calls with the same MAC may both pass
/// the service's pre-check, and exactly one of them has to fail with
/// [`FeederError::Conflict`].
pub trait DeviceRepository {
    /// Insert a new device.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send;

    /// Get a device by its unique identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send;

    /// Get a device by its MAC address.
    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send;

    /// Get the device linked to a product.
    fn find_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send;

    /// All devices owned by a user.
    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, FeederError>> + Send;

    /// Distinct users owning at least one device.
    fn list_owners(&self) -> impl Future<Output = Result<Vec<UserId>, FeederError>> + Send;

    /// Overwrite an existing device. The MAC and creation time are never changed.
    ///
    /// Fails with [`FeederError::NotFound`] when no stored device has this id.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send;
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send {
        (**self).create(device)
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        (**self).find_by_mac(mac)
    }

    fn find_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        (**self).find_by_product(product_id)
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, FeederError>> + Send {
        (**self).find_by_owner(owner_id)
    }

    fn list_owners(&self) -> impl Future<Output = Result<Vec<UserId>, FeederError>> + Send {
        (**self).list_owners()
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send {
        (**self).update(device)
    }
}

/// Append-only store of [`HistoryEntry`] snapshots.
pub trait HistoryRepository {
    /// Persist a new snapshot.
    fn append(
        &self,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<HistoryEntry, FeederError>> + Send;

    /// All snapshots for a MAC, newest first.
    ///
    /// Entries sharing a timestamp come back with the later insertion first.
    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, FeederError>> + Send;
}

impl<T: HistoryRepository + Send + Sync> HistoryRepository for Arc<T> {
    fn append(
        &self,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<HistoryEntry, FeederError>> + Send {
        (**self).append(entry)
    }

    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, FeederError>> + Send {
        (**self).find_by_mac(mac)
    }
}
