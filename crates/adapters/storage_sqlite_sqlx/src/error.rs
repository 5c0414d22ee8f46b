//! Storage-specific error type wrapping sqlx errors.

use feederhub_domain::error::FeederError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for FeederError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
