//! DNS resolver that never hands internal addresses to reqwest.
//!
//! A host name passes [`super::validate_probe_target`] as text, yet may still
//! resolve to loopback or a private range. This resolver runs the system
//! lookup and drops every internal address before reqwest opens a socket.

use std::io;
use std::net::SocketAddr;

use log::debug;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};

use super::url_validation::is_internal_ip;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `reqwest::dns::Resolve` over the system resolver, public addresses only.
///
/// Fails when every address of the name is internal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeResolver;

impl Resolve for SafeResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = format!("{}:0", name.as_str());
            let resolved: Vec<SocketAddr> = tokio::net::lookup_host(&host)
                .await
                .map_err(|e| -> BoxError { Box::new(e) })?
                .collect();

            let public = public_addrs(name.as_str(), resolved)?;
            let addrs: Addrs = Box::new(public.into_iter());
            Ok(addrs)
        })
    }
}

/// Keeps the public addresses of `host`; an empty result is an error.
fn public_addrs(host: &str, resolved: Vec<SocketAddr>) -> Result<Vec<SocketAddr>, BoxError> {
    let total = resolved.len();
    let public: Vec<SocketAddr> = resolved
        .into_iter()
        .filter(|addr| !is_internal_ip(addr.ip()))
        .collect();

    if public.len() < total {
        debug!(
            "Dropped {} internal address(es) resolved for {}",
            total - public.len(),
            host
        );
    }
    if public.is_empty() {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("'{}' resolves only to internal addresses", host),
        )));
    }
    Ok(public)
}
