//! HTTP surface: `POST /api/verifyTransaction` and `GET /health`

mod error;
mod handler;

pub use error::{ApiError, ABI_FETCH_FAILED, PROCESSING_FAILED};
pub use handler::VerifyResponse;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::app::App;

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/api/verifyTransaction", post(handler::verify_transaction))
        .route("/health", get(handler::health))
        .with_state(app)
}

/// Serve until ctrl-c
pub async fn serve(app: Arc<App>, listen: &str) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
