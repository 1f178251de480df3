// storage/models.rs
// Analysis log records

use serde::Serialize;

use crate::models::Network;
use crate::security::{Finding, MaxSeverity};

/// A log entry to be appended.
///
/// `findings` is the exact text stored in the `findings` column, normally a
/// JSON array (see [`findings_to_text`]).
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub original_url: String,
    pub final_url: String,
    pub network: Network,
    pub max_severity: MaxSeverity,
    pub findings: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub size_approx: Option<i64>,
    /// Unix seconds; the database clock is used when absent
    pub timestamp: Option<i64>,
}

/// Serializes findings for the `findings` column.
pub fn findings_to_text(findings: &[Finding]) -> Result<String, serde_json::Error> {
    serde_json::to_string(findings)
}

/// A stored row of `analysis_logs`.
///
/// `findings` holds the parsed JSON when the stored text is valid JSON and the
/// raw text (as a JSON string) otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisLogEntry {
    pub id: i64,
    pub original_url: String,
    pub final_url: String,
    /// Unix seconds
    pub timestamp: i64,
    pub network: Network,
    pub max_severity: MaxSeverity,
    pub findings: serde_json::Value,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub size_approx: Option<i64>,
}

/// Parses stored findings text, keeping non-JSON text as a string value.
pub(crate) fn parse_findings(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}
