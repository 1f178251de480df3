//! Vulnerability checks against a resolved video URL.
//!
//! Runs a small set of independent checks, in a fixed order:
//! - Transport (plain HTTP)
//! - CORS probe (network)
//! - Access tokens in the query string
//! - Internal identifiers in the URL
//!
//! Each check contributes zero or one finding; a failing check contributes
//! nothing and never stops the others.
//!
//! Outbound probes go through a [`ProbeClient`], which refuses internal
//! targets before sending, on redirects and at DNS resolution.

mod analysis;
mod cors;
mod probe_client;
mod safe_resolver;
mod types;
mod url_validation;

use log::{debug, warn};
use url::Url;

pub use analysis::{check_exposed_tokens, check_internal_identifiers, check_transport};
pub use cors::{classify_cors_headers, probe_cors};
pub use probe_client::ProbeClient;
pub use safe_resolver::SafeResolver;
pub use types::{max_severity, Finding, FindingKind, MaxSeverity, Severity};
pub use url_validation::{guarded_redirect_policy, validate_probe_target};

/// Runs the vulnerability checks.
///
/// Holds the client used by the CORS probe; otherwise stateless, so one
/// scanner is shared by every request.
#[derive(Clone)]
pub struct VulnerabilityScanner {
    probe: ProbeClient,
}

impl VulnerabilityScanner {
    pub fn new(probe: ProbeClient) -> Self {
        Self { probe }
    }

    /// Runs every check against `final_url` and returns the findings in
    /// evaluation order.
    ///
    /// A URL that cannot be parsed yields no findings.
    pub async fn scan(&self, final_url: &str) -> Vec<Finding> {
        let url = match Url::parse(final_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping checks for unparseable URL {}: {}", final_url, e);
                return Vec::new();
            }
        };

        let mut findings = Vec::new();
        findings.extend(check_transport(&url));
        findings.extend(probe_cors(&self.probe, &url).await);
        findings.extend(check_exposed_tokens(&url));
        findings.extend(check_internal_identifiers(&url));

        debug!("{} finding(s) for {}", findings.len(), url);
        findings
    }
}
