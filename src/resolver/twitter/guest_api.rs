//! Guest-token authenticated X REST API.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{video_from_media, TweetMedia, TweetUser};
use crate::config::HEADER_X_GUEST_TOKEN;
use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo};
use crate::resolver::strategy::{post_title, FetchContext, Strategy};
use crate::resolver::target::PostTarget;

#[derive(Debug, Deserialize)]
struct GuestTokenResponse {
    guest_token: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    full_text: Option<String>,
    text: Option<String>,
    user: Option<TweetUser>,
    extended_entities: Option<ExtendedEntities>,
}

#[derive(Debug, Deserialize)]
struct ExtendedEntities {
    #[serde(default)]
    media: Vec<TweetMedia>,
}

/// Activates a guest token, then reads the tweet from `statuses/show.json`.
pub struct GuestApiStrategy;

#[async_trait]
impl Strategy for GuestApiStrategy {
    fn name(&self) -> &'static str {
        "x-guest-api"
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        let base = &ctx.endpoints.twitter_api_base;

        let activate = ctx
            .client
            .post(format!("{}/1.1/guest/activate.json", base))
            .timeout(ctx.request_timeout)
            .bearer_auth(&ctx.bearer_token);
        let token: GuestTokenResponse = ctx.fetch_json(activate).await?;
        debug!("Activated X guest token for tweet {}", target.id);

        let show = ctx
            .get(&format!("{}/1.1/statuses/show.json", base))
            .query(&[
                ("id", target.id.as_str()),
                ("include_entities", "true"),
                ("tweet_mode", "extended"),
            ])
            .bearer_auth(&ctx.bearer_token)
            .header(HEADER_X_GUEST_TOKEN, token.guest_token);
        let status: StatusResponse = ctx.fetch_json(show).await?;
        parse_status(&target.id, status)
    }
}

fn parse_status(id: &str, status: StatusResponse) -> Result<VideoInfo, StrategyError> {
    let media = status
        .extended_entities
        .map(|e| e.media)
        .ok_or(StrategyError::NoVideo)?;
    let text = status.full_text.or(status.text);
    let title = post_title(text.as_deref(), Network::X);
    let author = status.user.and_then(|u| u.screen_name);
    video_from_media(id, title, author, &media)
}
