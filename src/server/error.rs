//! HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error_handling::{DatabaseError, ResolveError};

/// Error returned by the HTTP handlers.
///
/// Every variant renders as `{"error": "<message>"}` with its status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request body or post URL.
    #[error("{0}")]
    BadRequest(String),

    /// No strategy could resolve the post.
    #[error("{0}")]
    Upstream(String),

    /// Storage failure; `context` is what the client sees.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: DatabaseError,
    },
}

impl ApiError {
    pub fn storage(context: &'static str, source: DatabaseError) -> Self {
        ApiError::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        if e.is_input_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Upstream(e.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::BadRequest(msg) | ApiError::Upstream(msg) => msg.clone(),
            ApiError::Storage { context, source } => {
                log::error!("{}: {}", context, source);
                context.to_string()
            }
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Network;

    #[test]
    fn test_resolve_errors_map_to_status() {
        assert_eq!(
            ApiError::from(ResolveError::UnsupportedPlatform).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ResolveError::InvalidUrl(Network::Instagram)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ResolveError::ExtractionFailed {
                network: Network::X,
                attempts: 5
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = ApiError::storage(
            "Failed to fetch logs",
            DatabaseError::CorruptRow("row 1".into()),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
