//! JSON REST handlers for ownership transfer and product stock.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use feederhub_app::ports::{DeviceRepository, HistoryRepository, ProductInventory};
use feederhub_domain::device::Device;
use feederhub_domain::id::ProductId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a transfer.
#[derive(Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "id_usuario", default)]
    pub owner_id: Option<String>,
}

/// Possible responses from the transfer endpoint.
pub enum TransferResponse {
    Ok(Json<Device>),
}

impl IntoResponse for TransferResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the deplete endpoint.
pub enum DepleteResponse {
    NoContent,
}

impl IntoResponse for DepleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Request body for setting a product's stock.
#[derive(Deserialize)]
pub struct StockRequest {
    pub stock: u32,
}

/// Stock level of a product.
#[derive(Serialize)]
pub struct StockBody {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    pub stock: u32,
}

/// Possible responses from the stock endpoints.
pub enum StockResponse {
    Ok(Json<StockBody>),
}

impl IntoResponse for StockResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn product_id(raw: &str) -> Result<ProductId, ApiError> {
    Ok(ProductId::parse_field(raw, "id_producto")?)
}

/// `PUT /api/device/{id}` where `{id}` is the product the device is sold as.
pub async fn transfer<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(id): Path<String>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<TransferResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let product_id = product_id(&id)?;
    let Json(req) = payload?;
    let device = state
        .ownership_service
        .transfer_and_deplete(product_id, req.owner_id.as_deref().unwrap_or_default())
        .await?;
    Ok(TransferResponse::Ok(Json(device)))
}

/// `POST /api/products/{id}/deplete`
pub async fn deplete<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(id): Path<String>,
) -> Result<DepleteResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    state.ownership_service.deplete_stock(product_id(&id)?).await?;
    Ok(DepleteResponse::NoContent)
}

/// `GET /api/products/{id}/stock`
pub async fn stock<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(id): Path<String>,
) -> Result<StockResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let product_id = product_id(&id)?;
    let stock = state.ownership_service.stock(product_id).await?;
    Ok(StockResponse::Ok(Json(StockBody { product_id, stock })))
}

/// `PUT /api/products/{id}/stock`
pub async fn set_stock<DR, HR, P>(
    State(state): State<AppState<DR, HR, P>>,
    Path(id): Path<String>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Result<StockResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    HR: HistoryRepository + Send + Sync + 'static,
    P: ProductInventory + Send + Sync + 'static,
{
    let product_id = product_id(&id)?;
    let Json(req) = payload?;
    state
        .ownership_service
        .set_stock(product_id, req.stock)
        .await?;
    Ok(StockResponse::Ok(Json(StockBody {
        product_id,
        stock: req.stock,
    })))
}
