//! HTTP mapping of core errors
//!
//! The core never deals in status codes; this module is the only place that
//! decides how an [`OrderError`] looks on the wire.

use crate::core::error::OrderError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&OrderError> for ErrorResponse {
    fn from(err: &OrderError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}

/// Get the HTTP status code for an error
pub fn status_code(err: &OrderError) -> StatusCode {
    match err {
        OrderError::Validation(_) => StatusCode::BAD_REQUEST,
        OrderError::NotFound { .. } | OrderError::NoOrders { .. } => StatusCode::NOT_FOUND,
        OrderError::AlreadyExists { .. } => StatusCode::CONFLICT,
        OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
