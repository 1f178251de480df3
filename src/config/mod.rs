//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, quality thresholds, endpoints)
//! - HTTP header and query parameter name constants
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, Endpoints, LogFormat, LogLevel};
