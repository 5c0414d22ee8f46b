//! `SQLite` implementation of [`HistoryRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use feederhub_app::ports::HistoryRepository;
use feederhub_domain::device::Mac;
use feederhub_domain::error::FeederError;
use feederhub_domain::history::HistoryEntry;
use feederhub_domain::id::{DeviceId, HistoryEntryId};

use crate::columns::{self, encode_timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(HistoryEntry);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(HistoryEntry {
            id: columns::parsed::<HistoryEntryId>(row, "id")?,
            device_id: columns::parsed::<DeviceId>(row, "device_id")?,
            mac: columns::mac(row)?,
            state: columns::state(row)?,
            schedule: columns::schedule(row)?,
            recorded_at: columns::timestamp(row, "recorded_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO device_history (
        id, device_id, mac,
        water_container, food_container, water_dish, food_dish, pump, servo,
        next_water, next_food, recorded_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

// rowid breaks timestamp ties: later insertion first
const SELECT_BY_MAC: &str = r"
    SELECT * FROM device_history
    WHERE mac = ?
    ORDER BY recorded_at DESC, rowid DESC
";

/// `SQLite`-backed, append-only history repository.
pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HistoryRepository for SqliteHistoryRepository {
    fn append(
        &self,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<HistoryEntry, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(entry.id.to_string())
                .bind(entry.device_id.to_string())
                .bind(entry.mac.as_str())
                .bind(entry.state.water_container.as_str())
                .bind(entry.state.food_container.as_str())
                .bind(entry.state.water_dish.as_str())
                .bind(entry.state.food_dish.as_str())
                .bind(entry.state.pump.as_str())
                .bind(entry.state.servo.as_str())
                .bind(encode_timestamp(entry.schedule.next_water))
                .bind(encode_timestamp(entry.schedule.next_food))
                .bind(encode_timestamp(entry.recorded_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(entry)
        }
    }

    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, FeederError>> + Send {
        let pool = self.pool.clone();
        let mac = mac.as_str().to_string();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_MAC)
                .bind(mac)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
