//! X/Twitter strategies and the media payload they share.
//!
//! The REST API and the syndication API describe videos with the same
//! `video_info.variants` shape; only the envelope differs.

mod guest_api;
mod mirror;
mod syndication;

pub use guest_api::GuestApiStrategy;
pub use mirror::MirrorStrategy;
pub use syndication::SyndicationStrategy;

use serde::Deserialize;

use crate::config::MP4_CONTENT_TYPE;
use crate::error_handling::StrategyError;
use crate::models::{VideoInfo, VideoVariant};

#[derive(Debug, Deserialize)]
pub(crate) struct TweetMedia {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub media_url_https: Option<String>,
    pub video_info: Option<TweetVideoInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetVideoInfo {
    #[serde(default)]
    pub variants: Vec<TweetVariant>,
    pub duration_millis: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetVariant {
    pub bitrate: Option<u64>,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetUser {
    pub screen_name: Option<String>,
}

/// Builds a `VideoInfo` from the first media entry that has MP4 variants.
///
/// HLS playlists are dropped. Photos and media without variants are skipped.
pub(crate) fn video_from_media(
    id: &str,
    title: String,
    author: Option<String>,
    media: &[TweetMedia],
) -> Result<VideoInfo, StrategyError> {
    for entry in media {
        if !matches!(entry.kind.as_str(), "video" | "animated_gif" | "") {
            continue;
        }
        let Some(video_info) = &entry.video_info else {
            continue;
        };

        let variants: Vec<VideoVariant> = video_info
            .variants
            .iter()
            .filter(|v| v.content_type == MP4_CONTENT_TYPE && !v.url.is_empty())
            .map(|v| VideoVariant::mp4(v.url.clone(), v.bitrate))
            .collect();
        if variants.is_empty() {
            continue;
        }

        return Ok(VideoInfo {
            id: id.to_string(),
            title,
            thumbnail: entry.media_url_https.clone(),
            variants,
            author,
            duration: video_info.duration_millis.map(|ms| ms as f64 / 1000.0),
        });
    }
    Err(StrategyError::NoVideo)
}
