//! The analysis pipeline (resolve, check, record) and server bootstrap.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error_handling::ResolveError;
use crate::initialization::init_client;
use crate::models::{Network, VideoInfo};
use crate::resolver::{PostTarget, Resolver};
use crate::security::{max_severity, Finding, MaxSeverity, ProbeClient, VulnerabilityScanner};
use crate::server::{start_server, AppState};
use crate::storage::{
    findings_to_text, init_db_pool_with_path, run_migrations, LogStore, NewLogEntry,
    SqliteLogStore,
};

/// Outcome of analyzing one post URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub original_url: String,
    pub network: Network,
    pub video: VideoInfo,
    pub vulnerabilities: Vec<Finding>,
    pub max_severity: MaxSeverity,
}

impl AnalysisReport {
    /// The log entry recording this analysis.
    pub fn to_log_entry(&self) -> Result<NewLogEntry, serde_json::Error> {
        Ok(NewLogEntry {
            original_url: self.original_url.clone(),
            final_url: self.video.mp4_url().to_string(),
            network: self.network,
            max_severity: self.max_severity,
            findings: findings_to_text(&self.vulnerabilities)?,
            title: Some(self.video.title.clone()),
            thumbnail: self.video.thumbnail.clone(),
            size_approx: i64::try_from(self.video.size_approx()).ok(),
            timestamp: None,
        })
    }
}

/// Resolves `url`, checks the resolved video URL and appends a log entry.
///
/// Logging is best effort: a storage failure is reported with `warn!` and the
/// report is returned unchanged.
///
/// # Errors
///
/// Only the resolver's errors: invalid input or an exhausted chain.
pub async fn analyze_url(
    url: &str,
    resolver: &Resolver,
    scanner: &VulnerabilityScanner,
    store: &dyn LogStore,
) -> Result<AnalysisReport, ResolveError> {
    let target = PostTarget::parse(url)?;
    let video = resolver.resolve_target(&target).await?;

    let vulnerabilities = scanner.scan(video.mp4_url()).await;
    let report = AnalysisReport {
        original_url: target.url.clone(),
        network: target.network,
        max_severity: max_severity(&vulnerabilities),
        video,
        vulnerabilities,
    };
    info!(
        "Analyzed {} post {}: {} finding(s), max severity {}",
        report.network,
        target.id,
        report.vulnerabilities.len(),
        report.max_severity
    );

    match report.to_log_entry() {
        Ok(entry) => {
            if let Err(e) = store.append(entry).await {
                warn!("Failed to record analysis of {}: {}", report.original_url, e);
            }
        }
        Err(e) => warn!("Failed to serialize findings for {}: {}", report.original_url, e),
    }

    Ok(report)
}

/// Opens the database, applies migrations and builds the shared server state.
///
/// # Errors
///
/// Fails if an HTTP client cannot be built or the database cannot be opened
/// or migrated.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let client = init_client(config).context("Failed to initialize HTTP client")?;
    let probe = ProbeClient::new(config).context("Failed to initialize probe client")?;
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if config.demo_mode {
        warn!("Demo mode is on: failed extractions return placeholder data");
    }

    Ok(AppState {
        resolver: Arc::new(Resolver::new(config, client, probe.clone())),
        scanner: Arc::new(VulnerabilityScanner::new(probe)),
        store: Arc::new(SqliteLogStore::new(pool)),
    })
}

/// Builds the state from `config` and serves the HTTP API.
///
/// Runs until the process stops or the server fails.
pub async fn serve(config: Config) -> Result<()> {
    let state = build_state(&config).await?;
    info!("Analysis log stored in {}", config.db_path.display());
    start_server(&config.listen, state).await
}
