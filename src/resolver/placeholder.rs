//! Demo-mode fallback returning clearly labelled placeholder data.

use async_trait::async_trait;

use crate::error_handling::StrategyError;
use crate::models::{Network, VideoInfo, VideoVariant};
use crate::resolver::strategy::{FetchContext, Strategy};
use crate::resolver::target::PostTarget;

/// Always succeeds with "(Demo)" data. Only appended to chains in demo mode.
pub struct PlaceholderStrategy;

#[async_trait]
impl Strategy for PlaceholderStrategy {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn attempt(
        &self,
        target: &PostTarget,
        _ctx: &FetchContext,
    ) -> Result<VideoInfo, StrategyError> {
        Ok(placeholder_video(target))
    }
}

/// Placeholder video for `target`.
pub fn placeholder_video(target: &PostTarget) -> VideoInfo {
    let (title, thumbnail, url, size) = match target.network {
        Network::X => (
            "X/Twitter video (Demo)",
            "https://via.placeholder.com/300x300/1DA1F2/white?text=X",
            format!(
                "https://video.twimg.com/amplify_video/demo-{}/vid/avc1/1280x720/demo.mp4",
                target.id
            ),
            2_000_000,
        ),
        Network::Instagram => (
            "Instagram video (Demo)",
            "https://via.placeholder.com/300x300/E4405F/white?text=Instagram",
            format!(
                "https://instagram.feoh3-1.fna.fbcdn.net/o1/v/t16/f2/m86/demo-video-{}.mp4",
                target.id
            ),
            1_500_000,
        ),
    };

    let mut variant = VideoVariant::mp4(url, None);
    variant.file_size = Some(size);

    VideoInfo {
        id: target.id.clone(),
        title: title.to_string(),
        thumbnail: Some(thumbnail.to_string()),
        variants: vec![variant],
        author: None,
        duration: None,
    }
}
