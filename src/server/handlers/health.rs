//! Liveness probe.

/// `GET /health`
pub async fn health_handler() -> &'static str {
    "ok"
}
