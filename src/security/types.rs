//! Finding and severity types.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Severity of a single finding.
///
/// Ordered so that `max()` over a list yields the most severe entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Highest severity across an analysis; `None` when nothing was found.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum MaxSeverity {
    None,
    Low,
    Medium,
    High,
}

impl From<Option<Severity>> for MaxSeverity {
    fn from(severity: Option<Severity>) -> Self {
        match severity {
            None => MaxSeverity::None,
            Some(Severity::Low) => MaxSeverity::Low,
            Some(Severity::Medium) => MaxSeverity::Medium,
            Some(Severity::High) => MaxSeverity::High,
        }
    }
}

/// Kinds of findings the checks can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    /// Video served over plain HTTP
    InsecureTransport,
    /// CDN answers any origin with `Access-Control-Allow-Origin: *`
    WildcardCors,
    /// CDN echoes the caller's origin back
    ReflectedCors,
    /// Signature, token or expiry parameters in the URL
    ExposedAccessToken,
    /// CDN-internal routing identifiers in the URL
    InternalIdentifier,
}

impl FindingKind {
    /// Returns a short code for the finding (stable, stored in the log table)
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::InsecureTransport => "insecure-transport",
            FindingKind::WildcardCors => "wildcard-cors",
            FindingKind::ReflectedCors => "reflected-cors",
            FindingKind::ExposedAccessToken => "exposed-access-token",
            FindingKind::InternalIdentifier => "internal-identifier",
        }
    }

    /// Returns the one-line issue title
    pub fn issue(&self) -> &'static str {
        match self {
            FindingKind::InsecureTransport => "Unencrypted transport",
            FindingKind::WildcardCors => "Permissive CORS policy",
            FindingKind::ReflectedCors => "Origin-reflecting CORS policy",
            FindingKind::ExposedAccessToken => "Access token exposed in URL",
            FindingKind::InternalIdentifier => "Internal identifiers exposed in URL",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::InsecureTransport => Severity::Medium,
            FindingKind::WildcardCors => Severity::Low,
            FindingKind::ReflectedCors => Severity::Medium,
            FindingKind::ExposedAccessToken => Severity::Low,
            FindingKind::InternalIdentifier => Severity::Low,
        }
    }

    /// Returns a human-readable description of the finding
    pub fn description(&self) -> &'static str {
        match self {
            FindingKind::InsecureTransport => {
                "The video URL uses http://, so the file and any tokens in the URL travel in clear text."
            }
            FindingKind::WildcardCors => {
                "The host allows any origin to read the video with Access-Control-Allow-Origin: *."
            }
            FindingKind::ReflectedCors => {
                "The host echoes the requesting Origin in Access-Control-Allow-Origin, so any site can read the video."
            }
            FindingKind::ExposedAccessToken => {
                "The URL carries signature, token or expiry parameters that grant access to whoever holds the link."
            }
            FindingKind::InternalIdentifier => {
                "The URL exposes CDN routing or internal media identifiers."
            }
        }
    }
}

/// One security-relevant observation about a resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub issue: String,
    pub severity: Severity,
    pub description: String,
}

impl Finding {
    /// Builds the finding with the kind's standard description.
    pub fn new(kind: FindingKind) -> Self {
        Self {
            id: kind.code().to_string(),
            issue: kind.issue().to_string(),
            severity: kind.severity(),
            description: kind.description().to_string(),
        }
    }

    /// Builds the finding with extra detail appended to the description.
    pub fn with_detail(kind: FindingKind, detail: &str) -> Self {
        let mut finding = Self::new(kind);
        finding.description = format!("{} {}", kind.description(), detail);
        finding
    }
}

/// Computes the highest severity present, or `MaxSeverity::None`.
pub fn max_severity(findings: &[Finding]) -> MaxSeverity {
    findings.iter().map(|f| f.severity).max().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn finding(severity: Severity) -> Finding {
        Finding {
            id: "test".into(),
            issue: "test".into(),
            severity,
            description: String::new(),
        }
    }

    #[test]
    fn test_max_severity_low_medium() {
        let findings = [finding(Severity::Low), finding(Severity::Medium)];
        assert_eq!(max_severity(&findings), MaxSeverity::Medium);
    }

    #[test]
    fn test_max_severity_empty() {
        assert_eq!(max_severity(&[]), MaxSeverity::None);
    }

    #[test]
    fn test_max_severity_high_low() {
        let findings = [finding(Severity::High), finding(Severity::Low)];
        assert_eq!(max_severity(&findings), MaxSeverity::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(MaxSeverity::None < MaxSeverity::Low);
    }

    #[test]
    fn test_max_severity_string_round_trip() {
        for value in ["None", "Low", "Medium", "High"] {
            let parsed = MaxSeverity::from_str(value).expect("known severity");
            assert_eq!(parsed.to_string(), value);
        }
        assert!(MaxSeverity::from_str("Critical").is_err());
    }

    #[test]
    fn test_finding_codes_are_unique() {
        let kinds = [
            FindingKind::InsecureTransport,
            FindingKind::WildcardCors,
            FindingKind::ReflectedCors,
            FindingKind::ExposedAccessToken,
            FindingKind::InternalIdentifier,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_finding_serialization_shape() {
        let finding = Finding::with_detail(FindingKind::ExposedAccessToken, "Parameters: oh, oe.");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["id"], "exposed-access-token");
        assert_eq!(json["severity"], "Low");
        assert!(json["description"]
            .as_str()
            .unwrap()
            .ends_with("Parameters: oh, oe."));
    }
}
