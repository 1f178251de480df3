//! Strategies that work from a post's public HTML page.

mod open_graph;
mod raw;

pub use open_graph::{parse_open_graph, OpenGraphStrategy};
pub use raw::{scan_instagram_video_url, scan_twimg_mp4s, RawHtmlStrategy, RawPattern};

use crate::models::Network;
use crate::resolver::strategy::FetchContext;
use crate::resolver::target::PostTarget;

/// Which public page of a post to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostPage {
    /// The canonical post page
    Post,
    /// Instagram's captioned embed page
    Embed,
}

impl PostPage {
    /// Absolute URL of this page for `target`.
    pub fn url_for(&self, target: &PostTarget, ctx: &FetchContext) -> String {
        match (target.network, self) {
            (Network::X, _) => format!("{}/i/status/{}", ctx.endpoints.twitter_web_base, target.id),
            (Network::Instagram, PostPage::Post) => {
                format!("{}/p/{}/", ctx.endpoints.instagram_web_base, target.id)
            }
            (Network::Instagram, PostPage::Embed) => format!(
                "{}/p/{}/embed/captioned/",
                ctx.endpoints.instagram_web_base, target.id
            ),
        }
    }
}
