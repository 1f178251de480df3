//! Strategy trait and the fetch context threaded through every strategy.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use serde::de::DeserializeOwned;

use super::target::PostTarget;
use crate::config::{Config, Endpoints, HTML_ACCEPT, HTML_ACCEPT_LANGUAGE, MAX_RESPONSE_BODY_SIZE, MAX_TITLE_CHARS};
use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo};

/// Trailing `https://t.co/...` links X appends to tweet text
static TRAILING_SHORT_LINKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*https://t\.co/\w+)+\s*$")
        .expect("Failed to compile t.co link regex - this is a bug")
});

/// Shared resources and settings for outbound calls.
///
/// Cloned cheaply (the client is a handle to a shared pool).
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// HTTP client, already configured with user agent and timeouts
    pub client: reqwest::Client,
    /// Third-party base URLs
    pub endpoints: Endpoints,
    /// Bearer token for X guest token activation
    pub bearer_token: String,
    /// Per-request timeout, also applied explicitly to each request
    pub request_timeout: Duration,
}

impl FetchContext {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            endpoints: config.endpoints.clone(),
            bearer_token: config.twitter_bearer_token.clone(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Builds a GET request carrying the per-request timeout.
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).timeout(self.request_timeout)
    }

    /// Fetches a post page as a browser would and returns its body.
    pub async fn fetch_html(&self, url: &str) -> Result<String, StrategyError> {
        let request = self
            .get(url)
            .header(ACCEPT, HTML_ACCEPT)
            .header(ACCEPT_LANGUAGE, HTML_ACCEPT_LANGUAGE);
        read_body(request).await
    }

    /// Sends `request` and decodes the JSON body into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StrategyError> {
        let body = read_body(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Sends a request, rejects non-success statuses and oversized bodies.
async fn read_body(request: reqwest::RequestBuilder) -> Result<String, StrategyError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(StrategyError::Status(status.as_u16()));
    }
    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BODY_SIZE as u64)
    {
        return Err(StrategyError::Parse(format!(
            "response body exceeds {} bytes",
            MAX_RESPONSE_BODY_SIZE
        )));
    }

    let body = response.text().await?;
    if body.len() > MAX_RESPONSE_BODY_SIZE {
        return Err(StrategyError::Parse(format!(
            "response body exceeds {} bytes",
            MAX_RESPONSE_BODY_SIZE
        )));
    }
    Ok(body)
}

/// One method of resolving a post to its video.
///
/// Strategies are independent: each receives the target and the fetch
/// context and either produces a `VideoInfo` or fails. The resolver decides
/// what happens next.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempts to resolve `target`.
    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError>;
}

/// Builds a title from post text: trailing t.co links stripped, whitespace
/// collapsed, cut to `MAX_TITLE_CHARS` characters. Empty text falls back to a
/// generic per-network title.
pub fn post_title(text: Option<&str>, network: Network) -> String {
    let text = text.unwrap_or_default();
    let text = TRAILING_SHORT_LINKS.replace(text, "");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return format!("{} video", network.display_name());
    }
    if collapsed.chars().count() > MAX_TITLE_CHARS {
        let cut: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        collapsed
    }
}
