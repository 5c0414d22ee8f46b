//! Shared application state for axum handlers.

use std::sync::Arc;

use feederhub_app::ports::{DeviceRepository, HistoryRepository, ProductInventory};
use feederhub_app::services::device_service::DeviceService;
use feederhub_app::services::history_service::HistoryService;
use feederhub_app::services::ownership_service::OwnershipService;
use feederhub_app::services::telemetry_gateway::TelemetryGateway;

/// Application state shared across all axum handlers.
///
/// Generic over the device repository, history repository and product
/// inventory to avoid dynamic dispatch. `Clone` is implemented manually so
/// the underlying types themselves do not need to be `Clone`; only the
/// `Arc` wrappers are cloned.
pub struct AppState<DR, HR, P> {
    /// Device registry.
    pub device_service: Arc<DeviceService<DR, HR>>,
    /// Snapshot ledger.
    pub history_service: Arc<HistoryService<HR>>,
    /// Ownership transfer and stock depletion.
    pub ownership_service: Arc<OwnershipService<DR, HR, P>>,
    /// Field report ingestion.
    pub telemetry_gateway: Arc<TelemetryGateway<DR, HR>>,
}

impl<DR, HR, P> Clone for AppState<DR, HR, P> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
            history_service: Arc::clone(&self.history_service),
            ownership_service: Arc::clone(&self.ownership_service),
            telemetry_gateway: Arc::clone(&self.telemetry_gateway),
        }
    }
}

impl<DR, HR, P> AppState<DR, HR, P>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    /// Wire every service on top of the given adapters.
    pub fn new(device_repo: DR, history_repo: HR, inventory: P) -> Self {
        let history_service = Arc::new(HistoryService::new(history_repo));
        let device_service = Arc::new(DeviceService::new(
            device_repo,
            Arc::clone(&history_service),
        ));
        let ownership_service = Arc::new(OwnershipService::new(
            Arc::clone(&device_service),
            inventory,
        ));
        let telemetry_gateway = Arc::new(TelemetryGateway::new(Arc::clone(&device_service)));

        Self {
            device_service,
            history_service,
            ownership_service,
            telemetry_gateway,
        }
    }
}
