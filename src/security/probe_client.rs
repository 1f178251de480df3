//! Client for requests to URLs handed back by third-party services.
//!
//! Used by the CORS probe and the size probe. A guarded client refuses
//! internal targets at three points: the URL text before sending, every
//! redirect hop, and DNS resolution.

use anyhow::{Context, Result};
use reqwest::RequestBuilder;
use url::Url;

use super::url_validation::validate_probe_target;
use crate::config::Config;
use crate::initialization::init_probe_client;

#[derive(Clone)]
pub struct ProbeClient {
    client: reqwest::Client,
    guarded: bool,
}

impl ProbeClient {
    /// Builds a guarded client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `reqwest::Error` if client creation fails.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: init_probe_client(config)?,
            guarded: true,
        })
    }

    /// Wraps `client` without any target checks.
    ///
    /// Only for talking to local mock servers.
    pub fn unguarded(client: reqwest::Client) -> Self {
        Self {
            client,
            guarded: false,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.guarded
    }

    /// A `GET` to `url`.
    ///
    /// # Errors
    ///
    /// Fails if the client is guarded and `url` points at an internal target.
    pub fn get(&self, url: &Url) -> Result<RequestBuilder> {
        self.check(url)?;
        Ok(self.client.get(url.as_str()))
    }

    /// A `HEAD` to `url`.
    ///
    /// # Errors
    ///
    /// Fails if `url` does not parse, or if the client is guarded and `url`
    /// points at an internal target.
    pub fn head(&self, url: &str) -> Result<RequestBuilder> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid probe URL {}", url))?;
        self.check(&parsed)?;
        Ok(self.client.head(parsed.as_str()))
    }

    fn check(&self, url: &Url) -> Result<()> {
        if self.guarded {
            validate_probe_target(url)?;
        }
        Ok(())
    }
}
