//! Static checks over the resolved URL itself.
//!
//! Each check inspects the parsed URL and returns at most one finding. They
//! never touch the network.

use chrono::{DateTime, Utc};
use url::Url;

use super::types::{Finding, FindingKind};
use crate::config::{INTERNAL_ID_QUERY_PARAMS, INTERNAL_NUMERIC_ID_MIN_DIGITS, TOKEN_QUERY_PARAMS};

/// Flags URLs that are not served over TLS.
pub fn check_transport(url: &Url) -> Option<Finding> {
    if url.scheme() == "https" {
        None
    } else {
        Some(Finding::new(FindingKind::InsecureTransport))
    }
}

/// Flags signature, token and expiry parameters in the query string.
///
/// The description names the parameters and, when an expiry marker can be
/// decoded, says whether the link is still valid.
pub fn check_exposed_tokens(url: &Url) -> Option<Finding> {
    let names = matching_param_names(url, is_token_param);
    if names.is_empty() {
        return None;
    }

    let mut detail = format!("Parameters: {}.", names.join(", "));
    if let Some(expiry) = expiry_hint(url) {
        if expiry > Utc::now() {
            detail.push_str(&format!(" The link stays valid until {}.", expiry.to_rfc3339()));
        } else {
            detail.push_str(&format!(" The link expired at {}.", expiry.to_rfc3339()));
        }
    }
    Some(Finding::with_detail(FindingKind::ExposedAccessToken, &detail))
}

/// Flags CDN routing parameters and long numeric media ids in the path.
pub fn check_internal_identifiers(url: &Url) -> Option<Finding> {
    let mut exposed = matching_param_names(url, |name| {
        INTERNAL_ID_QUERY_PARAMS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(name))
    });

    let numeric_ids = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| {
                    s.len() >= INTERNAL_NUMERIC_ID_MIN_DIGITS
                        && s.chars().all(|c| c.is_ascii_digit())
                })
                .count()
        })
        .unwrap_or(0);
    if numeric_ids > 0 {
        exposed.push(format!("{} numeric id path segment(s)", numeric_ids));
    }

    if exposed.is_empty() {
        None
    } else {
        Some(Finding::with_detail(
            FindingKind::InternalIdentifier,
            &format!("Exposed: {}.", exposed.join(", ")),
        ))
    }
}

fn is_token_param(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    TOKEN_QUERY_PARAMS.contains(&lower.as_str())
        || lower.ends_with("_token")
        || lower.ends_with("signature")
}

/// Distinct query parameter names accepted by `pred`, in first-seen order.
fn matching_param_names(url: &Url, pred: impl Fn(&str) -> bool) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (name, _) in url.query_pairs() {
        if pred(&name) && !names.iter().any(|n| n == name.as_ref()) {
            names.push(name.into_owned());
        }
    }
    names
}

/// Decodes an expiry marker: Meta CDN `oe` (hex seconds) or `expires`/`exp` (decimal seconds).
fn expiry_hint(url: &Url) -> Option<DateTime<Utc>> {
    url.query_pairs().find_map(|(name, value)| {
        let secs = match name.to_ascii_lowercase().as_str() {
            "oe" => i64::from_str_radix(&value, 16).ok(),
            "expires" | "exp" => value.parse::<i64>().ok(),
            _ => None,
        }?;
        DateTime::from_timestamp(secs, 0)
    })
}
