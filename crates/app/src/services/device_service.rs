//! Device service — registration, lookups and in-place updates of feeders.

use std::sync::Arc;

use feederhub_domain::device::{Device, Mac, Registration};
use feederhub_domain::error::{ConflictError, FeederError, NotFoundError, PartialFailureError};
use feederhub_domain::history::HistoryEntry;
use feederhub_domain::id::{DeviceId, ProductId, UserId};
use feederhub_domain::telemetry::Telemetry;
use feederhub_domain::time;

use super::history_service::HistoryService;
use crate::ports::{DeviceRepository, HistoryRepository};

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub device: Device,
    /// The initial history snapshot written alongside the device.
    pub snapshot: HistoryEntry,
}

/// How to locate the device whose owner is being reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSelector {
    Id(DeviceId),
    Product(ProductId),
}

/// Application service owning the device registry.
pub struct DeviceService<R, H> {
    repo: R,
    history: Arc<HistoryService<H>>,
}

impl<R: DeviceRepository, H: HistoryRepository> DeviceService<R, H> {
    /// Create a new service backed by the given repository; snapshots go
    /// through `history`.
    pub fn new(repo: R, history: Arc<HistoryService<H>>) -> Self {
        Self { repo, history }
    }

    /// Validate and persist a new device, then record its first snapshot.
    ///
    /// # Errors
    ///
    /// - [`FeederError::Validation`] listing every invalid field.
    /// - [`FeederError::Conflict`] if the MAC is already registered.
    /// - [`FeederError::PartialFailure`] if the device was stored but the
    ///   snapshot was not. The device is not rolled back.
    #[tracing::instrument(skip(self, registration), fields(mac = registration.mac.as_deref()))]
    pub async fn register(&self, registration: Registration) -> Result<Registered, FeederError> {
        let device = registration.into_device(time::now())?;

        // fast path for a friendly error; the store's unique index is what
        // actually guarantees uniqueness under concurrent registrations
        if self.repo.find_by_mac(&device.mac).await?.is_some() {
            return Err(ConflictError { mac: device.mac }.into());
        }

        let device = self.repo.create(device).await?;
        tracing::info!(device_id = %device.id, mac = %device.mac, "device registered");

        match self.history.record(&device).await {
            Ok(snapshot) => Ok(Registered { device, snapshot }),
            Err(err) => {
                tracing::warn!(mac = %device.mac, error = %err, "initial snapshot not recorded");
                Err(PartialFailureError::SnapshotNotRecorded {
                    device: Box::new(device),
                    source: Box::new(err),
                }
                .into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] when no device has this MAC.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_mac(&self, mac: &Mac) -> Result<Device, FeederError> {
        self.repo
            .find_by_mac(mac)
            .await?
            .ok_or_else(|| NotFoundError::DeviceByMac(mac.clone()).into())
    }

    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] when no device has this id.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: DeviceId) -> Result<Device, FeederError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::Device(id).into())
    }

    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] when no device is linked to the product.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_product(&self, product_id: ProductId) -> Result<Device, FeederError> {
        self.repo
            .find_by_product(product_id)
            .await?
            .ok_or_else(|| NotFoundError::ProductDevice(product_id).into())
    }

    /// Full-state retrieval: return the device and snapshot it into the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] for an unknown id, or a storage
    /// error from either repository.
    #[tracing::instrument(skip(self))]
    pub async fn inspect(&self, id: DeviceId) -> Result<Device, FeederError> {
        let device = self.get_by_id(id).await?;
        self.history.record(&device).await?;
        Ok(device)
    }

    /// Merge a partial telemetry report into the stored device.
    ///
    /// Unreported fields, the creation time and the owner keep their value.
    /// No snapshot is written.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] if no device has this MAC.
    #[tracing::instrument(skip(self, telemetry))]
    pub async fn apply_telemetry(
        &self,
        mac: &Mac,
        telemetry: &Telemetry,
    ) -> Result<Device, FeederError> {
        let mut device = self.get_by_mac(mac).await?;
        if telemetry.is_empty() {
            return Ok(device);
        }
        device.apply_telemetry(telemetry);
        self.repo.update(device).await
    }

    /// Overwrite the owner of the selected device.
    ///
    /// The previous owner is not kept anywhere.
    ///
    /// # Errors
    ///
    /// - [`FeederError::Validation`] if `owner` is blank or not an id.
    /// - [`FeederError::NotFound`] if no device matches `selector`.
    #[tracing::instrument(skip(self))]
    pub async fn reassign_owner(
        &self,
        selector: DeviceSelector,
        owner: &str,
    ) -> Result<Device, FeederError> {
        let owner_id = UserId::parse_field(owner, "id_usuario")?;
        let mut device = match selector {
            DeviceSelector::Id(id) => self.get_by_id(id).await?,
            DeviceSelector::Product(product_id) => self.get_by_product(product_id).await?,
        };
        device.reassign(owner_id);
        let device = self.repo.update(device).await?;
        tracing::info!(device_id = %device.id, owner_id = %owner_id, "device owner reassigned");
        Ok(device)
    }

    /// All devices owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] when the user owns no device.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Device>, FeederError> {
        let devices = self.repo.find_by_owner(owner_id).await?;
        if devices.is_empty() {
            return Err(NotFoundError::OwnedDevices(owner_id).into());
        }
        Ok(devices)
    }

    /// Distinct users owning at least one device.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_owners(&self) -> Result<Vec<UserId>, FeederError> {
        self.repo.list_owners().await
    }
}
