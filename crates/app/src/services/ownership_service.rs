//! Ownership service — hands a product's device over to a new owner and
//! marks the product as sold out.

use std::sync::Arc;

use feederhub_domain::device::Device;
use feederhub_domain::error::{FeederError, NotFoundError, PartialFailureError};
use feederhub_domain::id::ProductId;

use super::device_service::{DeviceSelector, DeviceService};
use crate::ports::{DeviceRepository, HistoryRepository, ProductInventory};

/// Coordinates the device registry with the external product inventory.
///
/// The two writes are not atomic. When the stock update fails after the
/// owner change committed, the caller gets a
/// [`PartialFailureError::StockNotDepleted`] and can retry
/// [`OwnershipService::deplete_stock`] on its own.
pub struct OwnershipService<R, H, P> {
    devices: Arc<DeviceService<R, H>>,
    inventory: P,
}

impl<R, H, P> OwnershipService<R, H, P>
where
    R: DeviceRepository,
    H: HistoryRepository,
    P: ProductInventory,
{
    pub fn new(devices: Arc<DeviceService<R, H>>, inventory: P) -> Self {
        Self { devices, inventory }
    }

    /// Reassign the device linked to `product_id`, then zero the product's stock.
    ///
    /// # Errors
    ///
    /// - [`FeederError::NotFound`] if no device is linked to the product.
    ///   Nothing is written.
    /// - [`FeederError::Validation`] if `new_owner` is blank or not an id.
    /// - [`FeederError::PartialFailure`] if the owner changed but the stock
    ///   did not.
    #[tracing::instrument(skip(self))]
    pub async fn transfer_and_deplete(
        &self,
        product_id: ProductId,
        new_owner: &str,
    ) -> Result<Device, FeederError> {
        let device = self.devices.get_by_product(product_id).await?;
        let device = self
            .devices
            .reassign_owner(DeviceSelector::Id(device.id), new_owner)
            .await?;

        if let Err(err) = self.inventory.deplete(product_id).await {
            tracing::warn!(
                %product_id,
                device_id = %device.id,
                error = %err,
                "owner reassigned but stock not depleted"
            );
            return Err(PartialFailureError::StockNotDepleted {
                device: Box::new(device),
                product_id,
                source: Box::new(err),
            }
            .into());
        }

        Ok(device)
    }

    /// Zero the stock of `product_id`. Idempotent, so it is safe to retry
    /// after a [`PartialFailureError::StockNotDepleted`].
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] for an unknown product, or a storage
    /// error from the inventory.
    #[tracing::instrument(skip(self))]
    pub async fn deplete_stock(&self, product_id: ProductId) -> Result<(), FeederError> {
        self.inventory.deplete(product_id).await
    }

    /// Set the stock of `product_id`, registering the product if needed.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the inventory.
    #[tracing::instrument(skip(self))]
    pub async fn set_stock(&self, product_id: ProductId, stock: u32) -> Result<(), FeederError> {
        self.inventory.set_stock(product_id, stock).await?;
        tracing::info!(%product_id, stock, "stock updated");
        Ok(())
    }

    /// Current stock of `product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] for an unknown product.
    #[tracing::instrument(skip(self))]
    pub async fn stock(&self, product_id: ProductId) -> Result<u32, FeederError> {
        self.inventory
            .current_stock(product_id)
            .await?
            .ok_or_else(|| NotFoundError::Product(product_id).into())
    }
}
