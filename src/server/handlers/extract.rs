//! Video resolution endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::super::error::ApiError;
use super::super::types::{AnalyzeResponse, AppState, ExtractResponse, UrlRequest};
use crate::run::analyze_url;

/// `POST /api/extract`: resolves a post URL to its video.
pub async fn extract_handler(
    State(state): State<AppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Json(request) = body?;
    let url = request.require_url()?;
    log::info!("Extract request for {}", url);

    let video = state.resolver.resolve(url).await?;
    Ok(Json(video.into()))
}

/// `POST /api/analyze`: resolves, checks and records a post URL.
pub async fn analyze_handler(
    State(state): State<AppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = body?;
    let url = request.require_url()?;
    log::info!("Analyze request for {}", url);

    let report = analyze_url(url, &state.resolver, &state.scanner, state.store.as_ref()).await?;
    Ok(Json(report.into()))
}
