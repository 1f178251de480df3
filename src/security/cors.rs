//! Cross-origin policy probe.

use log::debug;
use reqwest::header::{HeaderMap, RANGE};
use url::Url;

use super::probe_client::ProbeClient;
use super::types::{Finding, FindingKind};
use crate::config::{
    CORS_PROBE_ORIGIN, HEADER_ACCESS_CONTROL_ALLOW_CREDENTIALS, HEADER_ACCESS_CONTROL_ALLOW_ORIGIN,
    HEADER_ORIGIN,
};

/// Requests the first byte of the video with a foreign `Origin` and inspects
/// the CORS headers of the answer.
///
/// A refused target or any transport failure contributes no finding.
pub async fn probe_cors(probe: &ProbeClient, url: &Url) -> Option<Finding> {
    let request = match probe.get(url) {
        Ok(request) => request,
        Err(e) => {
            debug!("Not probing {}: {}", url, e);
            return None;
        }
    };

    let response = match request
        .header(HEADER_ORIGIN, CORS_PROBE_ORIGIN)
        .header(RANGE, "bytes=0-0")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            debug!("CORS probe of {} failed: {}", url, e);
            return None;
        }
    };

    debug!(
        "CORS probe of {} answered {}",
        url,
        response.status().as_u16()
    );
    classify_cors_headers(response.headers())
}

/// Maps the `Access-Control-Allow-*` headers of a response to a finding.
pub fn classify_cors_headers(headers: &HeaderMap) -> Option<Finding> {
    let allow_origin = headers
        .get(HEADER_ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)?;

    if allow_origin == "*" {
        return Some(Finding::new(FindingKind::WildcardCors));
    }

    if allow_origin.eq_ignore_ascii_case(CORS_PROBE_ORIGIN) {
        let with_credentials = headers
            .get(HEADER_ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        return Some(if with_credentials {
            Finding::with_detail(
                FindingKind::ReflectedCors,
                "Credentialed requests are allowed as well.",
            )
        } else {
            Finding::new(FindingKind::ReflectedCors)
        });
    }

    None
}
