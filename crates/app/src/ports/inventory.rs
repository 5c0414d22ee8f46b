//! Inventory port — stock levels of the products devices are sold as.

use std::future::Future;
use std::sync::Arc;

use feederhub_domain::error::FeederError;
use feederhub_domain::id::ProductId;

/// Stock operations on the product store.
pub trait ProductInventory {
    /// Set the product's stock, creating the product if it is unknown.
    fn set_stock(
        &self,
        product_id: ProductId,
        stock: u32,
    ) -> impl Future<Output = Result<(), FeederError>> + Send;

    /// Current stock of a product, `None` if the product is unknown.
    fn current_stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<u32>, FeederError>> + Send;

    /// Set the product's stock to zero.
    ///
    /// Idempotent. Fails with [`FeederError::NotFound`] if the product does
    /// not exist.
    fn deplete(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<(), FeederError>> + Send;
}

impl<T: ProductInventory + Send + Sync> ProductInventory for Arc<T> {
    fn set_stock(
        &self,
        product_id: ProductId,
        stock: u32,
    ) -> impl Future<Output = Result<(), FeederError>> + Send {
        (**self).set_stock(product_id, stock)
    }

    fn current_stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<u32>, FeederError>> + Send {
        (**self).current_stock(product_id)
    }

    fn deplete(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<(), FeederError>> + Send {
        (**self).deplete(product_id)
    }
}
