//! Third-party mirror API (vxtwitter).

use async_trait::async_trait;
use serde::Deserialize;

use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo, VideoVariant};
use crate::resolver::strategy::{post_title, FetchContext, Strategy};
use crate::resolver::target::PostTarget;

#[derive(Debug, Deserialize)]
struct MirrorResponse {
    text: Option<String>,
    user_screen_name: Option<String>,
    #[serde(default)]
    media_extended: Vec<MirrorMedia>,
}

#[derive(Debug, Deserialize)]
struct MirrorMedia {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    url: String,
    thumbnail_url: Option<String>,
    duration_millis: Option<u64>,
    size: Option<MirrorSize>,
}

#[derive(Debug, Deserialize)]
struct MirrorSize {
    height: Option<u32>,
}

/// Reads the tweet through the vxtwitter JSON API.
///
/// The mirror exposes a single MP4 per video and no bitrates; quality comes
/// from the reported frame size.
pub struct MirrorStrategy;

#[async_trait]
impl Strategy for MirrorStrategy {
    fn name(&self) -> &'static str {
        "x-mirror"
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        let url = format!(
            "{}/Twitter/status/{}",
            ctx.endpoints.twitter_mirror_base, target.id
        );
        let response: MirrorResponse = ctx.fetch_json(ctx.get(&url)).await?;
        parse_mirror(&target.id, response)
    }
}

fn parse_mirror(id: &str, data: MirrorResponse) -> Result<VideoInfo, StrategyError> {
    let media = data
        .media_extended
        .into_iter()
        .find(|m| matches!(m.kind.as_str(), "video" | "gif") && !m.url.is_empty())
        .ok_or(StrategyError::NoVideo)?;

    let variant =
        VideoVariant::mp4(media.url, None).with_height(media.size.and_then(|s| s.height));

    Ok(VideoInfo {
        id: id.to_string(),
        title: post_title(data.text.as_deref(), Network::X),
        thumbnail: media.thumbnail_url,
        variants: vec![variant],
        author: data.user_screen_name,
        duration: media.duration_millis.map(|ms| ms as f64 / 1000.0),
    })
}
