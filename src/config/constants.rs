//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, quality thresholds and third-party endpoint defaults.

/// Default listen address for the HTTP server
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
/// Default SQLite database path
pub const DB_PATH: &str = "./clip_audit.db";

// Network operation timeouts
/// Per-request timeout for every outbound HTTP call, in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Time budget for one extraction strategy (may span several requests), in seconds
/// Must stay above REQUEST_TIMEOUT_SECS so a strategy with two calls can finish
pub const STRATEGY_TIMEOUT_SECS: u64 = 15;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Redirect hops a guarded probe client follows before giving up
pub const MAX_PROBE_REDIRECTS: usize = 5;

/// Default User-Agent string for HTTP requests.
///
/// Platform pages serve the Open Graph tags only to browser-like agents, so
/// this mirrors a current desktop Chrome build. Override with `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Accept header sent when fetching HTML pages
pub const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
/// Accept-Language header sent when fetching HTML pages
pub const HTML_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

// Response size limits
/// Maximum HTML/JSON body size we are willing to scan (4MB)
/// Instagram pages embed large JSON blobs, so this is higher than a typical page
pub const MAX_RESPONSE_BODY_SIZE: usize = 4 * 1024 * 1024;
/// Maximum title length kept from post text (characters)
pub const MAX_TITLE_CHARS: usize = 100;

// Quality classification (bits per second)
/// Bitrate at or above which a variant is FullHD (1080p)
pub const FULL_HD_MIN_BITRATE: u64 = 2_000_000;
/// Bitrate at or above which a variant is HD (720p)
pub const HD_MIN_BITRATE: u64 = 1_000_000;
/// Bitrate at or above which a variant is SD (480p)
pub const SD_MIN_BITRATE: u64 = 500_000;

/// Content type of the progressive MP4 renditions we return
pub const MP4_CONTENT_TYPE: &str = "video/mp4";

// Third-party endpoints (overridable for tests and proxies)
/// Base URL of the X REST API (guest token + statuses/show)
pub const TWITTER_API_BASE: &str = "https://api.twitter.com";
/// Base URL of the public tweet syndication API
pub const TWITTER_SYNDICATION_BASE: &str = "https://cdn.syndication.twimg.com";
/// Base URL of the vxtwitter mirror API
pub const TWITTER_MIRROR_BASE: &str = "https://api.vxtwitter.com";
/// Base URL of the X web front-end
pub const TWITTER_WEB_BASE: &str = "https://x.com";
/// Base URL of the Instagram web front-end
pub const INSTAGRAM_WEB_BASE: &str = "https://www.instagram.com";

/// Public bearer token embedded in the X web client.
///
/// Only grants guest access; used to activate a guest token.
pub const TWITTER_WEB_BEARER_TOKEN: &str =
    "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

/// Origin header value sent by the CORS probe
pub const CORS_PROBE_ORIGIN: &str = "https://cors-probe.clip-audit.invalid";
