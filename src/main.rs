//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `clip_audit` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use clip_audit::initialization::init_logger_with;
use clip_audit::{serve, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = serve(config).await {
        log::error!("{:#}", e);
        eprintln!("clip_audit error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
