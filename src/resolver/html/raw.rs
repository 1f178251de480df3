//! Regex scanning of raw page HTML.
//!
//! Last-resort strategies for pages whose meta tags are missing but whose
//! inline JSON still carries the media URL.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::PostPage;
use crate::error_handling::StrategyError;
use crate::models::{VideoInfo, VideoVariant};
use crate::resolver::strategy::{post_title, FetchContext, Strategy};
use crate::resolver::target::PostTarget;

static TWIMG_MP4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://video\.twimg\.com/[^"'\s<>\\]+?\.mp4(?:\?[^"'\s<>\\]*)?"#)
        .expect("Failed to compile twimg regex - this is a bug")
});

/// `"video_url":"..."`, also inside JSON that was itself embedded as a string
static INSTAGRAM_VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\\*"video_url\\*"\s*:\s*\\*"([^"]+?)\\*""#)
        .expect("Failed to compile video_url regex - this is a bug")
});

/// What to look for in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPattern {
    /// Direct `video.twimg.com` MP4 links
    TwimgMp4,
    /// Instagram's inline `"video_url"` field
    InstagramVideoUrl,
}

/// Fetches a post page and scans its HTML with a fixed pattern.
pub struct RawHtmlStrategy {
    name: &'static str,
    page: PostPage,
    pattern: RawPattern,
}

impl RawHtmlStrategy {
    pub fn new(name: &'static str, page: PostPage, pattern: RawPattern) -> Self {
        Self {
            name,
            page,
            pattern,
        }
    }
}

#[async_trait]
impl Strategy for RawHtmlStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        let html = ctx.fetch_html(&self.page.url_for(target, ctx)).await?;

        let variants = match self.pattern {
            RawPattern::TwimgMp4 => scan_twimg_mp4s(&html),
            RawPattern::InstagramVideoUrl => scan_instagram_video_url(&html)
                .map(|url| vec![VideoVariant::mp4(url, None)])
                .unwrap_or_default(),
        };
        if variants.is_empty() {
            return Err(StrategyError::NoVideo);
        }

        Ok(VideoInfo {
            id: target.id.clone(),
            title: post_title(None, target.network),
            thumbnail: None,
            variants,
            author: None,
            duration: None,
        })
    }
}

/// Distinct `video.twimg.com` MP4 URLs in `html`, highest quality first.
pub fn scan_twimg_mp4s(html: &str) -> Vec<VideoVariant> {
    let html = unescape_json_fragment(html);
    let mut variants: Vec<VideoVariant> = Vec::new();
    for m in TWIMG_MP4.find_iter(&html) {
        if !variants.iter().any(|v| v.url == m.as_str()) {
            variants.push(VideoVariant::mp4(m.as_str(), None));
        }
    }
    variants.sort_by(|a, b| b.quality.cmp(&a.quality));
    variants
}

/// First inline `"video_url"` value in `html`, unescaped.
pub fn scan_instagram_video_url(html: &str) -> Option<String> {
    INSTAGRAM_VIDEO_URL
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape_json_fragment(m.as_str()))
        .find(|url| url.starts_with("http"))
}

/// Undoes JSON string escaping (possibly applied more than once) for URLs.
fn unescape_json_fragment(raw: &str) -> String {
    let mut s = raw.to_string();
    while s.contains("\\\\") {
        s = s.replace("\\\\", "\\");
    }
    s.replace("\\u0026", "&")
        .replace("\\u003d", "=")
        .replace("\\u003D", "=")
        .replace('\\', "")
}
