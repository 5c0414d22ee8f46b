//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod history;
#[allow(clippy::missing_errors_doc)]
pub mod ownership;
#[allow(clippy::missing_errors_doc)]
pub mod telemetry;

use axum::Router;
use axum::routing::{get, post};

use feederhub_app::ports::{DeviceRepository, HistoryRepository, ProductInventory};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<DR, HR, P>() -> Router<AppState<DR, HR, P>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route("/addDevice", post(devices::register::<DR, HR, P>))
        .route(
            "/device/{id}",
            get(devices::inspect::<DR, HR, P>).put(ownership::transfer::<DR, HR, P>),
        )
        .route("/devices", get(devices::owners::<DR, HR, P>))
        .route(
            "/devices/{id_usuario}",
            get(devices::list_by_owner::<DR, HR, P>),
        )
        // Telemetry
        .route("/datosRecibidos", post(telemetry::ingest::<DR, HR, P>))
        // History
        .route("/historial/{mac}", get(history::list::<DR, HR, P>))
        // Inventory
        .route(
            "/products/{id}/deplete",
            post(ownership::deplete::<DR, HR, P>),
        )
        .route(
            "/products/{id}/stock",
            get(ownership::stock::<DR, HR, P>).put(ownership::set_stock::<DR, HR, P>),
        )
}
