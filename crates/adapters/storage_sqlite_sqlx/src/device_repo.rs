//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use feederhub_app::ports::DeviceRepository;
use feederhub_domain::device::{Device, Mac};
use feederhub_domain::error::{ConflictError, FeederError, NotFoundError};
use feederhub_domain::id::{DeviceId, ProductId, UserId};

use crate::columns::{self, encode_timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Device {
            id: columns::parsed::<DeviceId>(row, "id")?,
            mac: columns::mac(row)?,
            name: row.try_get("name")?,
            state: columns::state(row)?,
            schedule: columns::schedule(row)?,
            owner_id: columns::parsed::<UserId>(row, "owner_id")?,
            product_id: columns::parsed::<ProductId>(row, "product_id")?,
            created_at: columns::timestamp(row, "created_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (
        id, mac, name,
        water_container, food_container, water_dish, food_dish, pump, servo,
        next_water, next_food, owner_id, product_id, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_BY_MAC: &str = "SELECT * FROM devices WHERE mac = ?";
const SELECT_BY_PRODUCT: &str = "SELECT * FROM devices WHERE product_id = ? ORDER BY created_at LIMIT 1";
const SELECT_BY_OWNER: &str = "SELECT * FROM devices WHERE owner_id = ? ORDER BY created_at";
const SELECT_OWNERS: &str =
    "SELECT owner_id FROM devices GROUP BY owner_id ORDER BY MIN(created_at)";
// mac and created_at are never rewritten
const UPDATE: &str = r"
    UPDATE devices SET
        name = ?,
        water_container = ?, food_container = ?, water_dish = ?, food_dish = ?,
        pump = ?, servo = ?,
        next_water = ?, next_food = ?,
        owner_id = ?, product_id = ?
    WHERE id = ?
";

/// `SQLite`-backed device repository.
///
/// MAC uniqueness is guaranteed by the `idx_devices_mac` unique index; a
/// violation is reported as [`FeederError::Conflict`].
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn insert_error(err: sqlx::Error, mac: Mac) -> FeederError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return ConflictError { mac }.into();
    }
    StorageError::from(err).into()
}

impl DeviceRepository for SqliteDeviceRepository {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(device.id.to_string())
                .bind(device.mac.as_str())
                .bind(device.name.as_deref())
                .bind(device.state.water_container.as_str())
                .bind(device.state.food_container.as_str())
                .bind(device.state.water_dish.as_str())
                .bind(device.state.food_dish.as_str())
                .bind(device.state.pump.as_str())
                .bind(device.state.servo.as_str())
                .bind(encode_timestamp(device.schedule.next_water))
                .bind(encode_timestamp(device.schedule.next_food))
                .bind(device.owner_id.to_string())
                .bind(device.product_id.to_string())
                .bind(encode_timestamp(device.created_at))
                .execute(&pool)
                .await
                .map_err(|err| insert_error(err, device.mac.clone()))?;

            Ok(device)
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        let pool = self.pool.clone();
        let mac = mac.as_str().to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_MAC)
                .bind(mac)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_PRODUCT)
                .bind(product_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_OWNER)
                .bind(owner_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn list_owners(&self) -> impl Future<Output = Result<Vec<UserId>, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<(String,)> = sqlx::query_as(SELECT_OWNERS)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let owners = rows
                .into_iter()
                .map(|(raw,)| {
                    raw.parse::<UserId>()
                        .map_err(|err| StorageError::from(sqlx::Error::Decode(Box::new(err))))
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(owners)
        }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(device.name.as_deref())
                .bind(device.state.water_container.as_str())
                .bind(device.state.food_container.as_str())
                .bind(device.state.water_dish.as_str())
                .bind(device.state.food_dish.as_str())
                .bind(device.state.pump.as_str())
                .bind(device.state.servo.as_str())
                .bind(encode_timestamp(device.schedule.next_water))
                .bind(encode_timestamp(device.schedule.next_food))
                .bind(device.owner_id.to_string())
                .bind(device.product_id.to_string())
                .bind(device.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError::Device(device.id).into());
            }
            Ok(device)
        }
    }
}
