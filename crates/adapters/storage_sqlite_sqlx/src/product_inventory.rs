//! `SQLite` implementation of [`ProductInventory`].

use std::future::Future;

use sqlx::SqlitePool;

use feederhub_app::ports::ProductInventory;
use feederhub_domain::error::{FeederError, NotFoundError};
use feederhub_domain::id::ProductId;

use crate::error::StorageError;

const DEPLETE: &str = "UPDATE products SET stock = 0 WHERE id = ?";
const SELECT_STOCK: &str = "SELECT stock FROM products WHERE id = ?";
const UPSERT: &str = r"
    INSERT INTO products (id, stock) VALUES (?, ?)
    ON CONFLICT (id) DO UPDATE SET stock = excluded.stock
";

/// Stock levels kept in the `products` table.
pub struct SqliteProductInventory {
    pool: SqlitePool,
}

impl SqliteProductInventory {
    /// Create a new inventory using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ProductInventory for SqliteProductInventory {
    fn set_stock(
        &self,
        product_id: ProductId,
        stock: u32,
    ) -> impl Future<Output = Result<(), FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(product_id.to_string())
                .bind(i64::from(stock))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn current_stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<u32>, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_STOCK)
                .bind(product_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let stock = row
                .map(|(stock,)| u32::try_from(stock))
                .transpose()
                .map_err(|err| StorageError::from(sqlx::Error::Decode(Box::new(err))))?;
            Ok(stock)
        }
    }

    fn deplete(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<(), FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DEPLETE)
                .bind(product_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError::Product(product_id).into());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Config, Database};

    async fn setup() -> (Database, SqliteProductInventory) {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let inventory = SqliteProductInventory::new(db.pool().clone());
        (db, inventory)
    }

    #[tokio::test]
    async fn should_zero_stock_when_depleting() {
        let (_db, inventory) = setup().await;
        let product = ProductId::new();
        inventory.set_stock(product, 12).await.unwrap();

        inventory.deplete(product).await.unwrap();

        assert_eq!(inventory.current_stock(product).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn should_be_idempotent() {
        let (_db, inventory) = setup().await;
        let product = ProductId::new();
        inventory.set_stock(product, 3).await.unwrap();

        inventory.deplete(product).await.unwrap();
        inventory.deplete(product).await.unwrap();

        assert_eq!(inventory.current_stock(product).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_product() {
        let (_db, inventory) = setup().await;

        let result = inventory.deplete(ProductId::new()).await;

        assert!(matches!(
            result,
            Err(FeederError::NotFound(NotFoundError::Product(_)))
        ));
    }

    #[tokio::test]
    async fn should_overwrite_stock_when_set_twice() {
        let (_db, inventory) = setup().await;
        let product = ProductId::new();

        assert_eq!(inventory.current_stock(product).await.unwrap(), None);
        inventory.set_stock(product, 4).await.unwrap();
        inventory.set_stock(product, 9).await.unwrap();

        assert_eq!(inventory.current_stock(product).await.unwrap(), Some(9));
    }
}
