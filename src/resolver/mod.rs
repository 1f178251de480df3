//! Post URL resolution.
//!
//! A post URL is classified (`target`), then handed to its network's chain of
//! strategies. Strategies run strictly in order; the first one producing at
//! least one playable variant wins and the rest are never invoked. Each
//! strategy runs under its own time budget, and every failure is logged and
//! swallowed. Only input errors and exhaustion of the whole chain reach the
//! caller.

mod enrichment;
pub mod html;
pub mod instagram;
mod placeholder;
mod strategy;
mod target;
pub mod twitter;

use std::time::Duration;

use log::{debug, info, warn};

use crate::config::Config;
use crate::error_handling::{ResolveError, StrategyError};
use crate::models::{Network, VideoInfo};
use crate::security::ProbeClient;

pub use enrichment::probe_file_size;
pub use placeholder::{placeholder_video, PlaceholderStrategy};
pub use strategy::{post_title, FetchContext, Strategy};
pub use target::{detect_network, PostTarget};

use html::{OpenGraphStrategy, PostPage, RawHtmlStrategy, RawPattern};

/// Ordered list of strategies for one network.
pub type StrategyChain = Vec<Box<dyn Strategy>>;

/// The default X/Twitter chain.
pub fn x_chain() -> StrategyChain {
    vec![
        Box::new(twitter::GuestApiStrategy),
        Box::new(twitter::SyndicationStrategy),
        Box::new(twitter::MirrorStrategy),
        Box::new(OpenGraphStrategy::new(Network::X)),
        Box::new(RawHtmlStrategy::new(
            "x-raw-html",
            PostPage::Post,
            RawPattern::TwimgMp4,
        )),
    ]
}

/// The default Instagram chain.
pub fn instagram_chain() -> StrategyChain {
    vec![
        Box::new(instagram::JsonApiStrategy),
        Box::new(OpenGraphStrategy::new(Network::Instagram)),
        Box::new(RawHtmlStrategy::new(
            "instagram-raw-html",
            PostPage::Post,
            RawPattern::InstagramVideoUrl,
        )),
        Box::new(RawHtmlStrategy::new(
            "instagram-embed",
            PostPage::Embed,
            RawPattern::InstagramVideoUrl,
        )),
    ]
}

/// Resolves post URLs to video information.
///
/// Shared by every request; holds no per-request state.
pub struct Resolver {
    x_chain: StrategyChain,
    instagram_chain: StrategyChain,
    ctx: FetchContext,
    strategy_timeout: Duration,
    size_probe: Option<ProbeClient>,
}

impl Resolver {
    /// Builds a resolver with the default chains.
    ///
    /// In demo mode both chains end with the placeholder strategy. `probe`
    /// sends the size probe unless `no_size_probe` is set.
    pub fn new(config: &Config, client: reqwest::Client, probe: ProbeClient) -> Self {
        let mut x = x_chain();
        let mut instagram = instagram_chain();
        if config.demo_mode {
            x.push(Box::new(PlaceholderStrategy));
            instagram.push(Box::new(PlaceholderStrategy));
        }

        Self::with_chains(x, instagram, FetchContext::new(client, config))
            .strategy_timeout(config.strategy_timeout())
            .size_probe((!config.no_size_probe).then_some(probe))
    }

    /// Builds a resolver from explicit chains. Size probing is off.
    pub fn with_chains(x_chain: StrategyChain, instagram_chain: StrategyChain, ctx: FetchContext) -> Self {
        let strategy_timeout = ctx.request_timeout;
        Self {
            x_chain,
            instagram_chain,
            ctx,
            strategy_timeout,
            size_probe: None,
        }
    }

    /// Sets the time budget of a single strategy.
    pub fn strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout = timeout;
        self
    }

    /// Sets the client of the `HEAD` size probe run after a successful
    /// resolve; `None` turns the probe off.
    pub fn size_probe(mut self, probe: Option<ProbeClient>) -> Self {
        self.size_probe = probe;
        self
    }

    pub fn fetch_context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Resolves `url` to its video.
    ///
    /// # Errors
    ///
    /// Input errors (`MalformedUrl`, `UnsupportedPlatform`, `InvalidUrl`) are
    /// returned before any strategy runs. `ExtractionFailed` means every
    /// strategy of the chain failed.
    pub async fn resolve(&self, url: &str) -> Result<VideoInfo, ResolveError> {
        let target = PostTarget::parse(url)?;
        self.resolve_target(&target).await
    }

    /// Runs the chain of `target`'s network.
    ///
    /// # Errors
    ///
    /// `ExtractionFailed` when every strategy failed.
    pub async fn resolve_target(&self, target: &PostTarget) -> Result<VideoInfo, ResolveError> {
        debug!("Resolving {} post {}", target.network, target.id);

        let chain = match target.network {
            Network::X => &self.x_chain,
            Network::Instagram => &self.instagram_chain,
        };

        for strategy in chain {
            match self.run_strategy(strategy.as_ref(), target).await {
                Ok(mut video) => {
                    info!(
                        "Resolved {} post {} with {} ({} variant(s))",
                        target.network,
                        target.id,
                        strategy.name(),
                        video.variants.len()
                    );
                    if let Some(probe) = &self.size_probe {
                        probe_file_size(&mut video, probe).await;
                    }
                    return Ok(video);
                }
                Err(e) => warn!(
                    "Strategy {} failed for {} post {}: {}",
                    strategy.name(),
                    target.network,
                    target.id,
                    e
                ),
            }
        }

        Err(ResolveError::ExtractionFailed {
            network: target.network,
            attempts: chain.len(),
        })
    }

    /// Runs one strategy under the time budget and keeps only playable results.
    async fn run_strategy(
        &self,
        strategy: &dyn Strategy,
        target: &PostTarget,
    ) -> Result<VideoInfo, StrategyError> {
        let mut video = tokio::time::timeout(self.strategy_timeout, strategy.attempt(target, &self.ctx))
            .await
            .map_err(|_| StrategyError::BudgetExceeded(self.strategy_timeout))??;

        if !video.retain_playable() {
            return Err(StrategyError::NoVideo);
        }
        video.sort_variants();
        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> ProbeClient {
        ProbeClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_default_chain_order() {
        let names: Vec<&str> = x_chain().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "x-guest-api",
                "x-syndication",
                "x-mirror",
                "x-open-graph",
                "x-raw-html"
            ]
        );
        let names: Vec<&str> = instagram_chain().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "instagram-json-api",
                "instagram-open-graph",
                "instagram-raw-html",
                "instagram-embed"
            ]
        );
    }

    #[test]
    fn test_demo_mode_appends_placeholder() {
        let config = Config {
            demo_mode: true,
            ..Config::default()
        };
        let resolver = Resolver::new(&config, reqwest::Client::new(), probe());
        assert_eq!(resolver.x_chain.len(), 6);
        assert_eq!(
            resolver.instagram_chain.last().map(|s| s.name()),
            Some("placeholder")
        );

        let resolver = Resolver::new(&Config::default(), reqwest::Client::new(), probe());
        assert!(resolver.x_chain.iter().all(|s| s.name() != "placeholder"));
    }

    #[test]
    fn test_size_probe_follows_config() {
        let resolver = Resolver::new(&Config::default(), reqwest::Client::new(), probe());
        assert!(resolver.size_probe.as_ref().is_some_and(ProbeClient::is_guarded));

        let config = Config {
            no_size_probe: true,
            ..Config::default()
        };
        let resolver = Resolver::new(&config, reqwest::Client::new(), probe());
        assert!(resolver.size_probe.is_none());
    }
}
