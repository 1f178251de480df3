//! Public tweet syndication API (the embed widget backend).

use async_trait::async_trait;
use serde::Deserialize;

use super::{video_from_media, TweetMedia, TweetUser};
use crate::config::MP4_CONTENT_TYPE;
use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo, VideoVariant};
use crate::resolver::strategy::{post_title, FetchContext, Strategy};
use crate::resolver::target::PostTarget;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyndicationResponse {
    #[serde(rename = "__typename")]
    typename: Option<String>,
    #[serde(default)]
    text: String,
    user: Option<TweetUser>,
    media_details: Option<Vec<TweetMedia>>,
    video: Option<SyndicationVideo>,
}

#[derive(Debug, Deserialize)]
struct SyndicationVideo {
    poster: Option<String>,
    #[serde(default)]
    variants: Vec<SyndicationVideoVariant>,
}

#[derive(Debug, Deserialize)]
struct SyndicationVideoVariant {
    #[serde(rename = "type", default)]
    kind: String,
    src: Option<String>,
}

/// Reads `tweet-result` from the syndication CDN. No authentication needed.
pub struct SyndicationStrategy;

#[async_trait]
impl Strategy for SyndicationStrategy {
    fn name(&self) -> &'static str {
        "x-syndication"
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        let request = ctx
            .get(&format!(
                "{}/tweet-result",
                ctx.endpoints.twitter_syndication_base
            ))
            .query(&[("id", target.id.as_str()), ("token", "x")]);
        let response: SyndicationResponse = ctx.fetch_json(request).await?;
        parse_syndication(&target.id, response)
    }
}

fn parse_syndication(id: &str, data: SyndicationResponse) -> Result<VideoInfo, StrategyError> {
    if data.typename.as_deref() == Some("TweetTombstone") {
        return Err(StrategyError::NoVideo);
    }

    let title = post_title(Some(&data.text), Network::X);
    let author = data.user.and_then(|u| u.screen_name);

    if let Some(media) = &data.media_details {
        if let Ok(info) = video_from_media(id, title.clone(), author.clone(), media) {
            return Ok(info);
        }
    }

    // Single-video tweets sometimes only carry the `video` block
    let video = data.video.ok_or(StrategyError::NoVideo)?;
    let variants: Vec<VideoVariant> = video
        .variants
        .into_iter()
        .filter(|v| v.kind == MP4_CONTENT_TYPE)
        .filter_map(|v| v.src)
        .map(|src| VideoVariant::mp4(src, None))
        .collect();
    if variants.is_empty() {
        return Err(StrategyError::NoVideo);
    }

    Ok(VideoInfo {
        id: id.to_string(),
        title,
        thumbnail: video.poster,
        variants,
        author,
        duration: None,
    })
}
