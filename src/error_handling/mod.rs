//! Error handling.
//!
//! This module provides:
//! - Error type definitions for initialization, storage, resolution and strategies
//! - Categorization of HTTP client errors into strategy failures
//!
//! Errors fall into three groups:
//! - **Input errors**: malformed or unsupported URLs, surfaced verbatim
//! - **Exhaustion**: every strategy failed, surfaced as one user-facing error
//! - **Contained failures**: single strategies, single checks and log writes,
//!   which are logged and never reach the caller

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use types::{DatabaseError, InitializationError, ResolveError, StrategyError};
