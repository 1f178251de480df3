//! Probe target validation (SSRF guard).
//!
//! The CORS probe sends a request to whatever URL a third-party service handed
//! back. Before doing so we refuse targets that point into the server's own
//! network:
//! - Non-HTTP(S) schemes (file://, ftp://, ...)
//! - Localhost names
//! - Private, loopback, link-local, multicast and reserved IP literals
//!
//! The same check runs again on every redirect hop of a guarded client, and
//! host names are filtered after resolution by [`super::SafeResolver`].

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use anyhow::{anyhow, Result};
use log::debug;
use reqwest::redirect::Policy;
use url::{Host, Url};

/// Validates that a resolved video URL is safe to probe.
///
/// # Examples
///
/// ```
/// use clip_audit::security::validate_probe_target;
/// use url::Url;
///
/// let cdn = Url::parse("https://video.twimg.com/a.mp4").unwrap();
/// assert!(validate_probe_target(&cdn).is_ok());
///
/// let internal = Url::parse("http://10.0.0.8/a.mp4").unwrap();
/// assert!(validate_probe_target(&internal).is_err());
/// ```
pub fn validate_probe_target(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "scheme '{}' is not probed (only http:// and https://)",
            url.scheme()
        ));
    }

    match url.host() {
        Some(Host::Domain(domain)) if is_localhost_domain(domain) => {
            Err(anyhow!("localhost domain '{}' is not probed", domain))
        }
        Some(Host::Ipv4(ip)) if is_internal_ipv4(ip) => {
            Err(anyhow!("internal IPv4 address '{}' is not probed", ip))
        }
        Some(Host::Ipv6(ip)) if is_internal_ipv6(ip) => {
            Err(anyhow!("internal IPv6 address '{}' is not probed", ip))
        }
        Some(_) => Ok(()),
        None => Err(anyhow!("URL has no host component")),
    }
}

/// Redirect policy for guarded clients: every hop must pass
/// [`validate_probe_target`], and chains stop after `max_hops`.
///
/// A refused hop stops the chain and hands back the redirect response itself.
pub fn guarded_redirect_policy(max_hops: usize) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_hops {
            return attempt.error(format!("more than {} redirects", max_hops));
        }
        match validate_probe_target(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(e) => {
                debug!("Not following redirect to {}: {}", attempt.url(), e);
                attempt.stop()
            }
        }
    })
}

/// Whether `ip` lies in a range the server must never connect to.
pub(crate) fn is_internal_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_ipv4(v4),
        IpAddr::V6(v6) => is_internal_ipv6(v6),
    }
}

/// Loopback, RFC 1918, link-local, this-network, multicast and reserved ranges.
fn is_internal_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || a == 0
        || (a == 100 && (64..=127).contains(&b)) // carrier-grade NAT
        || a >= 224
}

/// Loopback, unspecified, unique-local (fc00::/7), link-local (fe80::/10) and multicast.
fn is_internal_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_internal_ipv4(mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
        || (first & 0xff00) == 0xff00
}

fn is_localhost_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain == "localhost.localdomain" || domain.ends_with(".localhost")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(url: &str) -> Result<()> {
        validate_probe_target(&Url::parse(url).expect("test URL parses"))
    }

    #[test]
    fn test_public_cdn_hosts_allowed() {
        assert!(check("https://video.twimg.com/ext_tw_video/1/pu/vid/a.mp4").is_ok());
        assert!(check("https://scontent.cdninstagram.com/v/t50/a.mp4?oh=1").is_ok());
        assert!(check("http://192.0.2.1/a.mp4").is_ok());
    }

    #[test]
    fn test_internal_ipv4_rejected() {
        for url in [
            "http://127.0.0.1/a.mp4",
            "http://10.1.2.3/a.mp4",
            "http://172.16.0.1/a.mp4",
            "http://192.168.1.1/a.mp4",
            "http://169.254.169.254/latest/meta-data",
            "http://0.0.0.0/",
            "http://100.64.0.1/",
            "http://239.1.1.1/",
        ] {
            assert!(check(url).is_err(), "{} should be rejected", url);
        }
    }

    #[test]
    fn test_internal_ipv6_rejected() {
        assert!(check("http://[::1]/a.mp4").is_err());
        assert!(check("http://[fd00::1]/a.mp4").is_err());
        assert!(check("http://[fe80::1]/a.mp4").is_err());
        assert!(check("http://[::ffff:10.0.0.1]/a.mp4").is_err());
        assert!(check("http://[2001:db8::1]/a.mp4").is_ok());
    }

    #[test]
    fn test_localhost_names_rejected() {
        assert!(check("http://localhost:8080/").is_err());
        assert!(check("http://api.localhost/").is_err());
        assert!(check("http://LOCALHOST./").is_err());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(check("file:///etc/passwd").is_err());
        assert!(check("ftp://example.com/a.mp4").is_err());
    }

    #[test]
    fn test_is_internal_ip() {
        assert!(is_internal_ip("127.0.0.1".parse().unwrap()));
        assert!(is_internal_ip("169.254.169.254".parse().unwrap()));
        assert!(is_internal_ip("::1".parse().unwrap()));
        assert!(!is_internal_ip("93.184.216.34".parse().unwrap()));
        assert!(!is_internal_ip("2607:f8b0:4004:800::200e".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_redirect_into_private_range_is_not_followed() {
        use httptest::{matchers::*, responders::*, Expectation, Server};

        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/hop")).respond_with(
                status_code(302).append_header("Location", "http://10.0.0.1/admin"),
            ),
        );
        // No safe resolver here, so the first hop can reach the local server
        let client = reqwest::Client::builder()
            .redirect(guarded_redirect_policy(5))
            .build()
            .expect("client builds");

        let response = client
            .get(server.url_str("/hop"))
            .send()
            .await
            .expect("redirect response is returned");
        assert_eq!(response.status().as_u16(), 302);
    }
}
