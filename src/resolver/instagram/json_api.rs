//! Instagram web JSON API (`?__a=1&__d=dis`).
//!
//! Two response shapes are in circulation: the older GraphQL envelope
//! (`graphql.shortcode_media`) and the newer feed shape (`items[0]` with
//! `video_versions`). Both are accepted.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{HEADER_X_IG_APP_ID, INSTAGRAM_WEB_APP_ID};
use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo, VideoVariant};
use crate::resolver::strategy::{post_title, FetchContext, Strategy};
use crate::resolver::target::PostTarget;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    graphql: Option<GraphqlEnvelope>,
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Debug, Deserialize)]
struct ShortcodeMedia {
    #[serde(default)]
    is_video: bool,
    video_url: Option<String>,
    display_url: Option<String>,
    video_duration: Option<f64>,
    dimensions: Option<Dimensions>,
    owner: Option<Owner>,
    edge_media_to_caption: Option<CaptionEdges>,
    edge_sidecar_to_children: Option<SidecarEdges>,
}

#[derive(Debug, Deserialize)]
struct Dimensions {
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionEdges {
    #[serde(default)]
    edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
struct CaptionEdge {
    node: CaptionNode,
}

#[derive(Debug, Deserialize)]
struct CaptionNode {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SidecarEdges {
    #[serde(default)]
    edges: Vec<SidecarEdge>,
}

#[derive(Debug, Deserialize)]
struct SidecarEdge {
    node: SidecarNode,
}

#[derive(Debug, Deserialize)]
struct SidecarNode {
    #[serde(default)]
    is_video: bool,
    video_url: Option<String>,
    display_url: Option<String>,
    dimensions: Option<Dimensions>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    video_versions: Vec<VideoVersion>,
    image_versions2: Option<ImageVersions>,
    video_duration: Option<f64>,
    user: Option<Owner>,
    caption: Option<FeedCaption>,
}

#[derive(Debug, Deserialize)]
struct VideoVersion {
    #[serde(default)]
    url: String,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ImageVersions {
    #[serde(default)]
    candidates: Vec<ImageCandidate>,
}

#[derive(Debug, Deserialize)]
struct ImageCandidate {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedCaption {
    text: Option<String>,
}

/// Queries the post through the web client's JSON endpoint.
pub struct JsonApiStrategy;

#[async_trait]
impl Strategy for JsonApiStrategy {
    fn name(&self) -> &'static str {
        "instagram-json-api"
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        let request = ctx
            .get(&format!(
                "{}/p/{}/",
                ctx.endpoints.instagram_web_base, target.id
            ))
            .query(&[("__a", "1"), ("__d", "dis")])
            .header(HEADER_X_IG_APP_ID, INSTAGRAM_WEB_APP_ID);
        let response: ApiResponse = ctx.fetch_json(request).await?;
        parse_api_response(&target.id, response)
    }
}

fn parse_api_response(code: &str, data: ApiResponse) -> Result<VideoInfo, StrategyError> {
    if let Some(media) = data.graphql.and_then(|g| g.shortcode_media) {
        return from_shortcode_media(code, media);
    }
    let item = data.items.into_iter().next().ok_or(StrategyError::NoVideo)?;
    from_feed_item(code, item)
}

fn from_shortcode_media(code: &str, media: ShortcodeMedia) -> Result<VideoInfo, StrategyError> {
    let caption = media
        .edge_media_to_caption
        .and_then(|c| c.edges.into_iter().next())
        .and_then(|e| e.node.text);
    let author = media.owner.and_then(|o| o.username);

    // Carousels: the first video child stands in for the post
    let (video_url, thumbnail, height) = match media.edge_sidecar_to_children {
        Some(sidecar) if !media.is_video => sidecar
            .edges
            .into_iter()
            .map(|e| e.node)
            .find(|n| n.is_video && n.video_url.is_some())
            .map(|n| (n.video_url, n.display_url, n.dimensions.and_then(|d| d.height)))
            .ok_or(StrategyError::NoVideo)?,
        _ => (
            media.video_url,
            media.display_url,
            media.dimensions.and_then(|d| d.height),
        ),
    };
    let video_url = video_url
        .filter(|u| !u.is_empty())
        .ok_or(StrategyError::NoVideo)?;

    Ok(VideoInfo {
        id: code.to_string(),
        title: post_title(caption.as_deref(), Network::Instagram),
        thumbnail,
        variants: vec![VideoVariant::mp4(video_url, None).with_height(height)],
        author,
        duration: media.video_duration,
    })
}

fn from_feed_item(code: &str, item: FeedItem) -> Result<VideoInfo, StrategyError> {
    let mut variants: Vec<VideoVariant> = Vec::new();
    for version in item.video_versions {
        // Several versions often share one URL at different nominal sizes
        if version.url.is_empty() || variants.iter().any(|v| v.url == version.url) {
            continue;
        }
        variants.push(VideoVariant::mp4(version.url, None).with_height(version.height));
    }
    if variants.is_empty() {
        return Err(StrategyError::NoVideo);
    }
    variants.sort_by(|a, b| b.quality.cmp(&a.quality));

    Ok(VideoInfo {
        id: code.to_string(),
        title: post_title(
            item.caption.and_then(|c| c.text).as_deref(),
            Network::Instagram,
        ),
        thumbnail: item
            .image_versions2
            .and_then(|i| i.candidates.into_iter().next())
            .and_then(|c| c.url),
        variants,
        author: item.user.and_then(|u| u.username),
        duration: item.video_duration,
    })
}
