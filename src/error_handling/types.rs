//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::models::Network;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Findings could not be serialized for storage.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A stored value could not be mapped back to its type.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Errors surfaced to callers of the resolver.
///
/// Input errors are reported before any network call. Individual strategy
/// failures never appear here; only exhaustion of the whole chain does.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The input is not an absolute URL.
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// The host is neither X/Twitter nor Instagram.
    #[error("Unsupported platform. Only X/Twitter and Instagram URLs are supported.")]
    UnsupportedPlatform,

    /// The URL belongs to a supported platform but has no post id.
    #[error("Invalid {} URL: {}", .0.display_name(), .0.expected_shape())]
    InvalidUrl(Network),

    /// Every strategy in the chain failed.
    #[error(
        "Could not locate a playable video for this {} post ({} extraction strategies failed)",
        .network.display_name(),
        .attempts
    )]
    ExtractionFailed {
        /// Platform whose chain was exhausted
        network: Network,
        /// Number of strategies attempted
        attempts: usize,
    },
}

impl ResolveError {
    /// Whether the error was caused by the caller's input rather than upstream services.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ResolveError::ExtractionFailed { .. })
    }
}

/// Failure of a single extraction strategy.
///
/// Always contained by the resolver: logged, then the next strategy runs.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Connection, TLS or body transfer failure.
    #[error("request failed: {0}")]
    Network(#[source] ReqwestError),

    /// The per-request timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The upstream answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Parse(String),

    /// The response was well-formed but contained no playable video.
    #[error("no playable video in response")]
    NoVideo,

    /// The strategy as a whole ran past its time budget.
    #[error("exceeded its {0:?} time budget")]
    BudgetExceeded(Duration),
}

impl From<serde_json::Error> for StrategyError {
    fn from(e: serde_json::Error) -> Self {
        StrategyError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_messages() {
        assert_eq!(
            ResolveError::InvalidUrl(Network::X).to_string(),
            "Invalid X/Twitter URL: expected a numeric id after status/"
        );
        assert_eq!(
            ResolveError::InvalidUrl(Network::Instagram).to_string(),
            "Invalid Instagram URL: expected a shortcode after reel/ or p/"
        );
        let exhausted = ResolveError::ExtractionFailed {
            network: Network::Instagram,
            attempts: 4,
        };
        assert!(exhausted.to_string().contains("Instagram"));
        assert!(exhausted.to_string().contains('4'));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(ResolveError::UnsupportedPlatform.is_input_error());
        assert!(ResolveError::MalformedUrl("nope".into()).is_input_error());
        assert!(ResolveError::InvalidUrl(Network::X).is_input_error());
        assert!(!ResolveError::ExtractionFailed {
            network: Network::X,
            attempts: 5
        }
        .is_input_error());
    }

    #[test]
    fn test_serde_error_becomes_parse_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(StrategyError::from(err), StrategyError::Parse(_)));
    }
}
