//! Open Graph meta tag scraping.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};

use super::PostPage;
use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo, VideoVariant};
use crate::resolver::strategy::{post_title, FetchContext, Strategy};
use crate::resolver::target::PostTarget;

/// Video URL properties, most specific first
const OG_VIDEO_PROPERTIES: &[&str] = &["og:video:url", "og:video:secure_url", "og:video"];

static OG_META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[property^='og:']").expect("Failed to parse og meta selector - this is a bug")
});

/// Fetches the post page and reads `og:video*`, `og:title` and `og:image`.
pub struct OpenGraphStrategy {
    name: &'static str,
}

impl OpenGraphStrategy {
    pub fn new(network: Network) -> Self {
        let name = match network {
            Network::X => "x-open-graph",
            Network::Instagram => "instagram-open-graph",
        };
        Self { name }
    }
}

#[async_trait]
impl Strategy for OpenGraphStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        let html = ctx.fetch_html(&PostPage::Post.url_for(target, ctx)).await?;
        parse_open_graph(&html, target)
    }
}

/// Extracts a video from the Open Graph tags of `html`.
///
/// Fails with `NoVideo` when none of the video properties is present.
pub fn parse_open_graph(html: &str, target: &PostTarget) -> Result<VideoInfo, StrategyError> {
    let document = Html::parse_document(html);
    let og = |property: &str| -> Option<String> {
        document
            .select(&OG_META_SELECTOR)
            .filter(|el| el.value().attr("property") == Some(property))
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(str::to_string)
    };

    let video_url = OG_VIDEO_PROPERTIES
        .iter()
        .find_map(|p| og(p))
        .ok_or(StrategyError::NoVideo)?;
    let height = og("og:video:height").and_then(|h| h.parse().ok());
    let variant = match og("og:video:type") {
        Some(content_type) if content_type.starts_with("video/") => {
            VideoVariant::new(video_url, None, &content_type)
        }
        _ => VideoVariant::mp4(video_url, None),
    }
    .with_height(height);

    Ok(VideoInfo {
        id: target.id.clone(),
        title: post_title(og("og:title").as_deref(), target.network),
        thumbnail: og("og:image"),
        variants: vec![variant],
        author: None,
        duration: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quality;

    fn target() -> PostTarget {
        PostTarget::parse("https://www.instagram.com/reel/Cabc/").unwrap()
    }

    #[test]
    fn test_prefers_video_url_property() {
        let html = r#"<html><head>
            <meta property="og:title" content="Creator on Instagram: &quot;sunset&quot;">
            <meta property="og:image" content="https://cdn/thumb.jpg">
            <meta property="og:video" content="https://cdn/plain.mp4">
            <meta property="og:video:secure_url" content="https://cdn/secure.mp4">
            <meta property="og:video:url" content="https://cdn/best.mp4?a=1&amp;b=2">
            <meta property="og:video:height" content="720">
        </head></html>"#;
        let info = parse_open_graph(html, &target()).unwrap();
        assert_eq!(info.mp4_url(), "https://cdn/best.mp4?a=1&b=2");
        assert_eq!(info.title, "Creator on Instagram: \"sunset\"");
        assert_eq!(info.thumbnail.as_deref(), Some("https://cdn/thumb.jpg"));
        assert_eq!(info.variants[0].quality, Quality::Hd);
    }

    #[test]
    fn test_secure_url_fallback() {
        let html = r#"<meta property="og:video:secure_url" content="https://cdn/secure.mp4">"#;
        let info = parse_open_graph(html, &target()).unwrap();
        assert_eq!(info.mp4_url(), "https://cdn/secure.mp4");
        assert_eq!(info.title, "Instagram video");
    }

    #[test]
    fn test_no_video_tags() {
        let html = r#"<meta property="og:title" content="Login"><meta property="og:video" content="">"#;
        assert!(matches!(
            parse_open_graph(html, &target()),
            Err(StrategyError::NoVideo)
        ));
    }
}
