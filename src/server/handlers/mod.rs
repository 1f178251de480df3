//! HTTP handlers.

mod extract;
mod health;
mod logs;

pub use extract::{analyze_handler, extract_handler};
pub use health::health_handler;
pub use logs::{create_log_handler, list_logs_handler};
