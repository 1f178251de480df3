//! Analysis log endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::super::error::ApiError;
use super::super::types::{AppState, LogPayload};
use crate::storage::AnalysisLogEntry;

/// `GET /api/logs`: every entry, newest first.
pub async fn list_logs_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisLogEntry>>, ApiError> {
    let entries = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch logs", e))?;
    Ok(Json(entries))
}

/// `POST /api/logs`: appends an entry and echoes the stored row.
pub async fn create_log_handler(
    State(state): State<AppState>,
    body: Result<Json<LogPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AnalysisLogEntry>), ApiError> {
    let Json(payload) = body?;
    let entry = payload.into_entry()?;

    let stored = state
        .store
        .append(entry)
        .await
        .map_err(|e| ApiError::storage("Failed to create log entry", e))?;
    log::debug!("Stored analysis log {}", stored.id);
    Ok((StatusCode::CREATED, Json(stored)))
}
