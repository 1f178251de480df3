//! Server state and request/response bodies.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::ApiError;
use crate::models::{Network, VideoInfo};
use crate::resolver::Resolver;
use crate::run::AnalysisReport;
use crate::security::{Finding, MaxSeverity, VulnerabilityScanner};
use crate::storage::{LogStore, NewLogEntry};

/// Shared state of the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub scanner: Arc<VulnerabilityScanner>,
    pub store: Arc<dyn LogStore>,
}

/// Body of `/api/extract` and `/api/analyze`
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl UrlRequest {
    /// The trimmed URL, or a 400 when it is missing or empty.
    pub fn require_url(&self) -> Result<&str, ApiError> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))
    }
}

/// JSON response of `/api/extract`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub video: VideoInfo,
    pub mp4_url: String,
    pub size_approx: u64,
}

impl From<VideoInfo> for ExtractResponse {
    fn from(video: VideoInfo) -> Self {
        Self {
            mp4_url: video.mp4_url().to_string(),
            size_approx: video.size_approx(),
            video,
        }
    }
}

/// JSON response of `/api/analyze`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub extract: ExtractResponse,
    pub vulnerabilities: Vec<Finding>,
    pub max_severity: MaxSeverity,
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(report: AnalysisReport) -> Self {
        Self {
            extract: report.video.into(),
            vulnerabilities: report.vulnerabilities,
            max_severity: report.max_severity,
        }
    }
}

/// Body of `POST /api/logs`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPayload {
    pub original_url: Option<String>,
    pub final_url: Option<String>,
    pub network: Option<String>,
    pub max_severity: Option<String>,
    /// `Some(Value::Null)` for an explicit `null`, `None` when absent
    #[serde(default, deserialize_with = "present")]
    pub findings: Option<serde_json::Value>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub size_approx: Option<i64>,
    pub timestamp: Option<i64>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

const MISSING_FIELDS: &str = "Missing required fields for log entry";

impl LogPayload {
    /// Validates the payload and converts it into a storable entry.
    ///
    /// Findings given as a string are stored verbatim; anything else is
    /// stored as its JSON text.
    pub fn into_entry(self) -> Result<NewLogEntry, ApiError> {
        let required = |field: Option<String>| field.filter(|s| !s.is_empty());
        let (Some(original_url), Some(final_url), Some(network), Some(max_severity), Some(findings)) = (
            required(self.original_url),
            required(self.final_url),
            required(self.network),
            required(self.max_severity),
            self.findings,
        ) else {
            return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
        };

        let network = Network::from_str(&network)
            .map_err(|_| ApiError::BadRequest(format!("Unknown network '{}'", network)))?;
        let max_severity = MaxSeverity::from_str(&max_severity).map_err(|_| {
            ApiError::BadRequest(format!("Unknown maxSeverity '{}'", max_severity))
        })?;
        let findings = match findings {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };

        Ok(NewLogEntry {
            original_url,
            final_url,
            network,
            max_severity,
            findings,
            title: self.title,
            thumbnail: self.thumbnail,
            size_approx: self.size_approx,
            timestamp: self.timestamp,
        })
    }
}
