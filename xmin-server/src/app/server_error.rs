use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use xmin_core::model::crs::CrsError;
use xmin_core::model::grid::GridError;
use xmin_core::model::roi::RoiError;
use xmin_core::model::routing::RoutingError;

/// request-level error taxonomy. only structural errors (bad input, service
/// not ready) carry a non-500 status; everything else is internal.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("service not ready, startup still in progress")]
    NotReady,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if matches!(self, ServerError::Internal(_)) {
            log::error!("request failed: {self}");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<RoiError> for ServerError {
    fn from(e: RoiError) -> Self {
        match e {
            RoiError::InvalidBoundingBox(_) => ServerError::BadRequest(e.to_string()),
            RoiError::TransformError { .. } => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<CrsError> for ServerError {
    fn from(e: CrsError) -> Self {
        ServerError::Internal(e.to_string())
    }
}

impl From<GridError> for ServerError {
    fn from(e: GridError) -> Self {
        ServerError::Internal(e.to_string())
    }
}

impl From<RoutingError> for ServerError {
    fn from(e: RoutingError) -> Self {
        ServerError::Internal(e.to_string())
    }
}
