use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use crate::app::{App, VerifyRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Serialized typed-data document
    pub clear_sign_message: String,
}

pub async fn verify_transaction(
    State(app): State<Arc<App>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(status = %rejection.status(), "unreadable request body");
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let document = app.verify_transaction(request).await?;
    let clear_sign_message = document.to_json_string().map_err(|err| {
        tracing::error!(%err, "failed serializing typed data");
        ApiError::internal(super::error::PROCESSING_FAILED)
    })?;
    Ok(Json(VerifyResponse { clear_sign_message }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
