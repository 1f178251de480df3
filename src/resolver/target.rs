//! Platform detection and post id extraction.
//!
//! Everything here is pure: a URL is classified and its id pulled out before
//! any strategy (and therefore any network call) runs.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error_handling::ResolveError;
use crate::models::Network;

static TWEET_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"status(?:es)?/(\d+)").expect("Failed to compile tweet id regex - this is a bug")
});

static INSTAGRAM_SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:reels?|p|tv)/([A-Za-z0-9_-]+)")
        .expect("Failed to compile Instagram shortcode regex - this is a bug")
});

const X_HOSTS: &[&str] = &["x.com", "twitter.com"];
const INSTAGRAM_HOSTS: &[&str] = &["instagram.com"];

/// A post URL that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTarget {
    pub network: Network,
    /// Tweet id (X) or shortcode (Instagram)
    pub id: String,
    /// The URL as submitted
    pub url: String,
}

impl PostTarget {
    /// Classifies `input` and extracts its post id.
    ///
    /// # Errors
    ///
    /// - `MalformedUrl` if `input` is not an absolute URL with a host
    /// - `UnsupportedPlatform` if the host is not X/Twitter or Instagram
    /// - `InvalidUrl` if the platform is known but no id can be found
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let input = input.trim();
        let url = Url::parse(input).map_err(|e| ResolveError::MalformedUrl(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| ResolveError::MalformedUrl("URL has no host".to_string()))?;

        let network = detect_network(host).ok_or(ResolveError::UnsupportedPlatform)?;
        let id = match network {
            Network::X => extract_tweet_id(url.path()),
            Network::Instagram => extract_shortcode(url.path()),
        }
        .ok_or(ResolveError::InvalidUrl(network))?;

        Ok(Self {
            network,
            id,
            url: input.to_string(),
        })
    }
}

/// Maps a host to its network. Subdomains (`mobile.twitter.com`,
/// `www.instagram.com`) match; lookalikes such as `netflix.com` do not.
pub fn detect_network(host: &str) -> Option<Network> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let matches = |domains: &[&str]| {
        domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    };

    if matches(X_HOSTS) {
        Some(Network::X)
    } else if matches(INSTAGRAM_HOSTS) {
        Some(Network::Instagram)
    } else {
        None
    }
}

fn extract_tweet_id(path: &str) -> Option<String> {
    TWEET_ID
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_shortcode(path: &str) -> Option<String> {
    INSTAGRAM_SHORTCODE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_urls() {
        for url in [
            "https://x.com/user/status/1790000000000000001",
            "https://twitter.com/user/status/1790000000000000001?s=20",
            "https://mobile.twitter.com/user/status/1790000000000000001/video/1",
            "https://x.com/i/status/1790000000000000001",
        ] {
            let target = PostTarget::parse(url).expect(url);
            assert_eq!(target.network, Network::X);
            assert_eq!(target.id, "1790000000000000001");
        }
    }

    #[test]
    fn test_instagram_urls() {
        let cases = [
            ("https://www.instagram.com/reel/C8abc_D-12/", "C8abc_D-12"),
            ("https://instagram.com/p/Cxyz123/?igsh=abc", "Cxyz123"),
            ("https://www.instagram.com/reels/DA1b2c3/", "DA1b2c3"),
            ("https://www.instagram.com/someone/p/Cq9/", "Cq9"),
        ];
        for (url, code) in cases {
            let target = PostTarget::parse(url).expect(url);
            assert_eq!(target.network, Network::Instagram);
            assert_eq!(target.id, code);
        }
    }

    #[test]
    fn test_unsupported_hosts() {
        for url in [
            "https://www.youtube.com/watch?v=abc",
            "https://netflix.com/status/123",
            "https://notinstagram.com/p/abc/",
        ] {
            assert!(
                matches!(PostTarget::parse(url), Err(ResolveError::UnsupportedPlatform)),
                "{} should be unsupported",
                url
            );
        }
    }

    #[test]
    fn test_invalid_platform_urls() {
        assert!(matches!(
            PostTarget::parse("https://x.com/user"),
            Err(ResolveError::InvalidUrl(Network::X))
        ));
        assert!(matches!(
            PostTarget::parse("https://x.com/user/status/abc"),
            Err(ResolveError::InvalidUrl(Network::X))
        ));
        assert!(matches!(
            PostTarget::parse("https://www.instagram.com/someone/"),
            Err(ResolveError::InvalidUrl(Network::Instagram))
        ));
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            PostTarget::parse("x.com/user/status/1"),
            Err(ResolveError::MalformedUrl(_))
        ));
        assert!(matches!(
            PostTarget::parse(""),
            Err(ResolveError::MalformedUrl(_))
        ));
    }
}
