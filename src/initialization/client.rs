//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_PROBE_REDIRECTS, TCP_CONNECT_TIMEOUT_SECS};
use crate::security::{guarded_redirect_policy, SafeResolver};

/// Initializes the shared HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Per-request timeout from the configuration
/// - TCP connect timeout
/// - Redirect following (reqwest default, up to 10 hops)
///
/// One client is built at startup and cloned into every component; clones
/// share the connection pool.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()
}

/// Initializes the client for requests to URLs returned by third parties
/// (CORS probe, size probe).
///
/// Same user agent and timeouts as [`init_client`], plus:
/// - DNS answers filtered through [`SafeResolver`]
/// - Every redirect hop validated, at most `MAX_PROBE_REDIRECTS` hops
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_probe_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .dns_resolver(Arc::new(SafeResolver))
        .redirect(guarded_redirect_policy(MAX_PROBE_REDIRECTS))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_defaults() {
        assert!(init_client(&Config::default()).is_ok());
    }

    #[test]
    fn test_init_client_rejects_invalid_user_agent() {
        let config = Config {
            user_agent: "bad\nagent".to_string(),
            ..Config::default()
        };
        assert!(init_client(&config).is_err());
    }

    #[tokio::test]
    async fn test_probe_client_refuses_name_resolving_to_loopback() {
        use httptest::Server;

        // No expectations: a request reaching the server fails verification on drop
        let server = Server::run();
        let client = init_probe_client(&Config::default()).expect("probe client builds");
        let url = format!("http://localhost:{}/latest/meta-data", server.addr().port());

        assert!(client.get(&url).send().await.is_err());
    }
}
