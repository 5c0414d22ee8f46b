//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use feederhub_domain::device::Device;
use feederhub_domain::error::{FeederError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    /// State committed by the first step of a partially failed operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<Device>,
}

/// Maps [`FeederError`] and request rejections to an HTTP response with
/// appropriate status code.
pub enum ApiError {
    Domain(FeederError),
    /// The body could not be read as the expected JSON shape.
    MalformedBody(String),
}

impl From<FeederError> for ApiError {
    fn from(err: FeederError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MalformedBody(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    kind: "validation",
                    device: None,
                },
            ),
            Self::Domain(err) => domain_response(&err),
        };

        (status, Json(body)).into_response()
    }
}

fn domain_response(err: &FeederError) -> (StatusCode, ErrorBody) {
    let (status, kind, device) = match err {
        FeederError::Validation(_) => (StatusCode::BAD_REQUEST, "validation", None),
        FeederError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
        FeederError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
        FeederError::PartialFailure(partial) => {
            tracing::warn!(error = %partial, "partial failure returned to caller");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "partial_failure",
                Some(partial.device().clone()),
            )
        }
        FeederError::Storage(source) => {
            tracing::error!(error = %source, "storage error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal server error".to_string(),
                    kind: "internal",
                    device: None,
                },
            );
        }
    };

    (
        status,
        ErrorBody {
            error: err.to_string(),
            kind,
            device,
        },
    )
}
