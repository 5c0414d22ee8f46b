//! # feederhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository and inventory ports defined in `feederhub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! The schema carries the invariants a bypassing write could break: a unique
//! index on the device MAC, `CHECK` constraints on every enumerated column,
//! two `NOT NULL` schedule columns, and triggers keeping `device_history`
//! append-only.
//!
//! ## Dependency rule
//! Depends on `feederhub-app` (for port traits) and `feederhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod columns;
mod device_repo;
mod error;
mod history_repo;
mod pool;
mod product_inventory;

pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use history_repo::SqliteHistoryRepository;
pub use pool::{Config, Database};
pub use product_inventory::SqliteProductInventory;
