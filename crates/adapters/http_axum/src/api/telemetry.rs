//! JSON REST handler for device field reports.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use feederhub_app::ports::{DeviceRepository, HistoryRepository, ProductInventory};
use feederhub_domain::device::Device;
use feederhub_domain::telemetry::Telemetry;

use crate::error::ApiError;
use crate::state::AppState;

/// A report as posted by the firmware: the MAC next to the readings.
#[derive(Deserialize)]
pub struct TelemetryReport {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(flatten)]
    pub telemetry: Telemetry,
}

/// Possible responses from the ingest endpoint.
pub enum IngestResponse {
    Ok(Json<Device>),
}

impl IntoResponse for IngestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/datosRecibidos`
pub async fn ingest<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    payload: Result<Json<TelemetryReport>, JsonRejection>,
) -> Result<IngestResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let Json(report) = payload?;
    let device = state
        .telemetry_gateway
        .ingest(report.mac.as_deref().unwrap_or_default(), &report.telemetry)
        .await?;
    Ok(IngestResponse::Ok(Json(device)))
}
