//! Error categorization.
//!
//! Maps `reqwest` failures onto the strategy error taxonomy so each failed
//! attempt is logged with a meaningful category.

use super::types::StrategyError;

/// Categorizes a `reqwest::Error` into a `StrategyError`.
///
/// Status errors (from `error_for_status`) keep their code, timeouts become
/// `Timeout`, body decoding failures become `Parse`, and everything else
/// (connect, TLS, redirect, body transfer) stays a `Network` error.
pub fn categorize_reqwest_error(error: reqwest::Error) -> StrategyError {
    if let Some(status) = error.status() {
        return StrategyError::Status(status.as_u16());
    }

    if error.is_timeout() {
        StrategyError::Timeout
    } else if error.is_decode() {
        StrategyError::Parse(error.to_string())
    } else {
        StrategyError::Network(error)
    }
}

impl From<reqwest::Error> for StrategyError {
    fn from(error: reqwest::Error) -> Self {
        categorize_reqwest_error(error)
    }
}
