//! JSON REST handler for device history.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use feederhub_app::ports::{DeviceRepository, HistoryRepository, ProductInventory};
use feederhub_domain::device::Mac;
use feederhub_domain::history::HistoryEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the history list endpoint.
pub enum ListResponse {
    /// 200 OK with snapshots, newest first.
    Ok(Json<Vec<HistoryEntry>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/historial/{mac}`
pub async fn list<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(mac): Path<String>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let mac = Mac::parse(&mac)?;
    let entries = state.history_service.history_for_mac(&mac).await?;
    Ok(ListResponse::Ok(Json(entries)))
}
