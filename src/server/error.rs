//! Mapping of conversion errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ConvertError;

pub const ABI_FETCH_FAILED: &str = "Failed to fetch contract ABI.";
pub const PROCESSING_FAILED: &str = "Failed to process transaction.";

/// Error body returned to callers: `{"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        match &err {
            ConvertError::Validation(fields) => {
                tracing::warn!(%err, "rejected request");
                Self::bad_request(format!("Missing required fields: {}.", fields.join(", ")))
            }
            ConvertError::AbiFetch(_) => {
                tracing::error!(%err, "abi resolution failed");
                Self::internal(ABI_FETCH_FAILED)
            }
            _ => {
                tracing::error!(%err, "conversion failed");
                Self::internal(PROCESSING_FAILED)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
