//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every option can also be supplied through the environment
//! (or a `.env` file loaded at startup).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_LISTEN_ADDR, DEFAULT_USER_AGENT, INSTAGRAM_WEB_BASE, REQUEST_TIMEOUT_SECS,
    STRATEGY_TIMEOUT_SECS, TWITTER_API_BASE, TWITTER_MIRROR_BASE, TWITTER_SYNDICATION_BASE,
    TWITTER_WEB_BASE, TWITTER_WEB_BEARER_TOKEN,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Base URLs of the third-party services the resolver talks to.
///
/// Hidden from `--help`; they exist so tests and proxies can redirect traffic.
#[derive(Debug, Clone, Args)]
pub struct Endpoints {
    /// X REST API base (guest token activation and statuses/show)
    #[arg(long, env = "CLIP_AUDIT_TWITTER_API_BASE", default_value = TWITTER_API_BASE, hide = true)]
    pub twitter_api_base: String,

    /// Tweet syndication API base
    #[arg(long, env = "CLIP_AUDIT_TWITTER_SYNDICATION_BASE", default_value = TWITTER_SYNDICATION_BASE, hide = true)]
    pub twitter_syndication_base: String,

    /// vxtwitter mirror API base
    #[arg(long, env = "CLIP_AUDIT_TWITTER_MIRROR_BASE", default_value = TWITTER_MIRROR_BASE, hide = true)]
    pub twitter_mirror_base: String,

    /// X web front-end base
    #[arg(long, env = "CLIP_AUDIT_TWITTER_WEB_BASE", default_value = TWITTER_WEB_BASE, hide = true)]
    pub twitter_web_base: String,

    /// Instagram web front-end base
    #[arg(long, env = "CLIP_AUDIT_INSTAGRAM_WEB_BASE", default_value = INSTAGRAM_WEB_BASE, hide = true)]
    pub instagram_web_base: String,
}

impl Endpoints {
    /// Points every endpoint at the same base URL (used with mock servers).
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            twitter_api_base: base.clone(),
            twitter_syndication_base: base.clone(),
            twitter_mirror_base: base.clone(),
            twitter_web_base: base.clone(),
            instagram_web_base: base,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            twitter_api_base: TWITTER_API_BASE.to_string(),
            twitter_syndication_base: TWITTER_SYNDICATION_BASE.to_string(),
            twitter_mirror_base: TWITTER_MIRROR_BASE.to_string(),
            twitter_web_base: TWITTER_WEB_BASE.to_string(),
            instagram_web_base: INSTAGRAM_WEB_BASE.to_string(),
        }
    }
}

/// Command-line options and configuration.
///
/// Generated by `clap` from the field attributes. `Config::default()` yields the
/// same values as an empty command line, for programmatic construction.
///
/// # Examples
///
/// ```bash
/// # Serve on the default address with the default database
/// clip_audit
///
/// # Custom port, database and shorter timeouts
/// clip_audit --listen 0.0.0.0:8080 --db-path ./audit.db --timeout-seconds 5
///
/// # Demo deployments only: fall back to placeholder data
/// CLIP_AUDIT_DEMO_MODE=true clip_audit
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clip_audit",
    about = "Resolves X/Twitter and Instagram post URLs to video files and audits them."
)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "CLIP_AUDIT_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Database path (SQLite file)
    #[arg(long, env = "CLIP_AUDIT_DB_PATH", value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds for outbound calls
    #[arg(long, env = "CLIP_AUDIT_TIMEOUT_SECONDS", default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Time budget in seconds for one extraction strategy
    #[arg(long, env = "CLIP_AUDIT_STRATEGY_TIMEOUT_SECONDS", default_value_t = STRATEGY_TIMEOUT_SECS)]
    pub strategy_timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, env = "CLIP_AUDIT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Bearer token used to activate X guest tokens
    #[arg(long, env = "TWITTER_BEARER_TOKEN", default_value = TWITTER_WEB_BEARER_TOKEN, hide_env_values = true)]
    pub twitter_bearer_token: String,

    /// Fall back to placeholder video data when every strategy fails.
    ///
    /// For demonstrations only: it masks real extraction failures.
    #[arg(long, env = "CLIP_AUDIT_DEMO_MODE")]
    pub demo_mode: bool,

    /// Skip the HEAD request that fills in the best variant's file size
    #[arg(long, env = "CLIP_AUDIT_NO_SIZE_PROBE")]
    pub no_size_probe: bool,

    #[command(flatten)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    /// Per-strategy time budget as a `Duration`.
    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_secs(self.strategy_timeout_seconds.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            db_path: PathBuf::from(DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            strategy_timeout_seconds: STRATEGY_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            twitter_bearer_token: TWITTER_WEB_BEARER_TOKEN.to_string(),
            demo_mode: false,
            no_size_probe: false,
            endpoints: Endpoints::default(),
        }
    }
}
