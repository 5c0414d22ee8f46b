//! JSON REST handlers for device registration and lookups.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use feederhub_app::ports::{DeviceRepository, HistoryRepository, ProductInventory};
use feederhub_app::services::device_service::Registered;
use feederhub_domain::device::{Device, Registration};
use feederhub_domain::history::HistoryEntry;
use feederhub_domain::id::{DeviceId, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of a successful registration.
#[derive(Serialize)]
pub struct RegisteredBody {
    pub device: Device,
    /// The initial snapshot.
    pub historial: HistoryEntry,
}

impl From<Registered> for RegisteredBody {
    fn from(registered: Registered) -> Self {
        Self {
            device: registered.device,
            historial: registered.snapshot,
        }
    }
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<RegisteredBody>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the inspect endpoint.
pub enum InspectResponse {
    Ok(Json<Device>),
}

impl IntoResponse for InspectResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the list-by-owner endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the owners endpoint.
pub enum OwnersResponse {
    Ok(Json<Vec<UserId>>),
}

impl IntoResponse for OwnersResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/addDevice`
pub async fn register<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<RegisterResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let Json(registration) = payload?;
    let registered = state.device_service.register(registration).await?;
    Ok(RegisterResponse::Created(Json(registered.into())))
}

/// `GET /api/device/{id}`
///
/// Returns the device and records a snapshot of its current state.
pub async fn inspect<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(id): Path<String>,
) -> Result<InspectResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let device_id = DeviceId::parse_field(&id, "id")?;
    let device = state.device_service.inspect(device_id).await?;
    Ok(InspectResponse::Ok(Json(device)))
}

/// `GET /api/devices/{id_usuario}`
pub async fn list_by_owner<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(owner): Path<String>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let owner_id = UserId::parse_field(&owner, "id_usuario")?;
    let devices = state.device_service.list_by_owner(owner_id).await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/devices`
pub async fn owners<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
) -> Result<OwnersResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let owners = state.device_service.list_owners().await?;
    Ok(OwnersResponse::Ok(Json(owners)))
}
