//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use feederhub_domain::device::{Device, Mac};
use feederhub_domain::error::{ConflictError, FeederError, NotFoundError};
use feederhub_domain::history::HistoryEntry;
use feederhub_domain::id::{DeviceId, ProductId, UserId};

use crate::ports::{DeviceRepository, HistoryRepository, ProductInventory};

fn unavailable() -> FeederError {
    FeederError::Storage("store unavailable".into())
}

/// Device store keeping insertion order; `create` enforces MAC uniqueness
/// under the lock, like a unique index would.
#[derive(Default)]
pub struct InMemoryDeviceRepo {
    store: Mutex<Vec<Device>>,
}

impl InMemoryDeviceRepo {
    pub fn count(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

impl DeviceRepository for InMemoryDeviceRepo {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result: Result<Device, FeederError> = if store.iter().any(|d| d.mac == device.mac) {
            Err(ConflictError { mac: device.mac }.into())
        } else {
            store.push(device.clone());
            Ok(device)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|d| d.id == id).cloned();
        async { Ok(result) }
    }

    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|d| &d.mac == mac).cloned();
        async { Ok(result) }
    }

    fn find_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<Device>, FeederError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|d| d.product_id == product_id).cloned();
        async { Ok(result) }
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, FeederError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Device> = store
            .iter()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn list_owners(&self) -> impl Future<Output = Result<Vec<UserId>, FeederError>> + Send {
        let store = self.store.lock().unwrap();
        let mut result: Vec<UserId> = Vec::new();
        for device in store.iter() {
            if !result.contains(&device.owner_id) {
                result.push(device.owner_id);
            }
        }
        async { Ok(result) }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FeederError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result: Result<Device, FeederError> =
            match store.iter_mut().find(|d| d.id == device.id) {
                Some(slot) => {
                    *slot = device.clone();
                    Ok(device)
                }
                None => Err(NotFoundError::Device(device.id).into()),
            };
        async { result }
    }
}

/// Append-only snapshot store; can be switched to fail every append.
#[derive(Default)]
pub struct InMemoryHistoryRepo {
    entries: Mutex<Vec<HistoryEntry>>,
    failing: AtomicBool,
}

impl InMemoryHistoryRepo {
    pub fn failing() -> Self {
        Self {
            failing: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl HistoryRepository for InMemoryHistoryRepo {
    fn append(
        &self,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<HistoryEntry, FeederError>> + Send {
        let result: Result<HistoryEntry, FeederError> = if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        };
        async { result }
    }

    fn find_by_mac(
        &self,
        mac: &Mac,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, FeederError>> + Send {
        let entries = self.entries.lock().unwrap();
        // reverse first so the stable sort keeps later insertions ahead on ties
        let mut result: Vec<HistoryEntry> = entries
            .iter()
            .rev()
            .filter(|e| &e.mac == mac)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        async { Ok(result) }
    }
}

/// Product stock levels; can be switched to fail every write.
#[derive(Default)]
pub struct InMemoryInventory {
    stock: Mutex<HashMap<ProductId, u32>>,
    failing: AtomicBool,
}

impl InMemoryInventory {
    pub fn with_product(product_id: ProductId, stock: u32) -> Self {
        let inventory = Self::default();
        inventory.stock.lock().unwrap().insert(product_id, stock);
        inventory
    }

    pub fn stock(&self, product_id: ProductId) -> Option<u32> {
        self.stock.lock().unwrap().get(&product_id).copied()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ProductInventory for InMemoryInventory {
    fn set_stock(
        &self,
        product_id: ProductId,
        stock: u32,
    ) -> impl Future<Output = Result<(), FeederError>> + Send {
        let result: Result<(), FeederError> = if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            self.stock.lock().unwrap().insert(product_id, stock);
            Ok(())
        };
        async { result }
    }

    fn current_stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<u32>, FeederError>> + Send {
        let result = self.stock(product_id);
        async move { Ok(result) }
    }

    fn deplete(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<(), FeederError>> + Send {
        let result: Result<(), FeederError> = if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            match self.stock.lock().unwrap().get_mut(&product_id) {
                Some(stock) => {
                    *stock = 0;
                    Ok(())
                }
                None => Err(NotFoundError::Product(product_id).into()),
            }
        };
        async { result }
    }
}
