//! HTTP API.
//!
//! Endpoints:
//! - `POST /api/extract` - resolve a post URL to its video
//! - `POST /api/analyze` - resolve, run the vulnerability checks and record the result
//! - `GET /api/logs` / `POST /api/logs` - read and append the analysis log
//! - `GET /health` - liveness probe

mod error;
mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;

use handlers::{
    analyze_handler, create_log_handler, extract_handler, health_handler, list_logs_handler,
};
pub use error::ApiError;
pub use types::{AnalyzeResponse, AppState, ExtractResponse, LogPayload, UrlRequest};

/// Builds the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/extract", post(extract_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/logs", get(list_logs_handler).post(create_log_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Binds `listen` and serves the API until the process stops.
pub async fn start_server(listen: &str, state: AppState) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", listen, e))?;

    log::info!("Listening on http://{}/", listen);
    log::info!("  - Extract: POST http://{}/api/extract", listen);
    log::info!("  - Analyze: POST http://{}/api/analyze", listen);
    log::info!("  - Logs: http://{}/api/logs", listen);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
