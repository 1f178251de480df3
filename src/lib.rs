//! clip_audit library: resolve social video posts and audit the result
//!
//! Turns an X/Twitter or Instagram post URL into a directly playable MP4 URL
//! by walking an ordered chain of extraction strategies, runs a handful of
//! surface security checks against the resolved URL, and records each
//! analysis in a SQLite log.
//!
//! # Example
//!
//! ```no_run
//! use clip_audit::{serve, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), anyhow::Error> {
//! let config = Config {
//!     listen: "0.0.0.0:8080".to_string(),
//!     ..Default::default()
//! };
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod resolver;
mod run;
pub mod security;
pub mod server;
pub mod storage;

// Re-export public API
pub use config::{Config, Endpoints, LogFormat, LogLevel};
pub use error_handling::{DatabaseError, InitializationError, ResolveError, StrategyError};
pub use models::{Network, Quality, VideoInfo, VideoVariant};
pub use resolver::{FetchContext, PostTarget, Resolver, Strategy};
pub use run::{analyze_url, build_state, serve, AnalysisReport};
pub use security::{Finding, MaxSeverity, ProbeClient, Severity, VulnerabilityScanner};
pub use storage::{run_migrations, AnalysisLogEntry, LogStore, NewLogEntry, SqliteLogStore};
