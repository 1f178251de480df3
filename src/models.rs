//! Core data model: platforms, video variants and resolved video info.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::config::{FULL_HD_MIN_BITRATE, HD_MIN_BITRATE, MP4_CONTENT_TYPE, SD_MIN_BITRATE};

/// `/1280x720/` style resolution hints embedded in CDN paths
static RESOLUTION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(\d{2,5})x(\d{2,5})/").expect("Failed to compile resolution regex - this is a bug")
});

/// Social network a post URL belongs to.
///
/// Stored in the log table as `"x"` or `"instagram"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Network {
    #[serde(rename = "instagram")]
    #[strum(serialize = "instagram")]
    Instagram,
    #[serde(rename = "x")]
    #[strum(serialize = "x")]
    X,
}

impl Network {
    /// Human-facing platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Instagram => "Instagram",
            Network::X => "X/Twitter",
        }
    }

    /// What a valid post URL must contain, for error messages.
    pub fn expected_shape(&self) -> &'static str {
        match self {
            Network::Instagram => "expected a shortcode after reel/ or p/",
            Network::X => "expected a numeric id after status/",
        }
    }
}

/// Quality bucket of a video rendition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum Quality {
    Low,
    #[serde(rename = "SD")]
    #[strum(serialize = "SD")]
    Sd,
    #[serde(rename = "HD")]
    #[strum(serialize = "HD")]
    Hd,
    #[serde(rename = "FullHD")]
    #[strum(serialize = "FullHD")]
    FullHd,
}

impl Quality {
    /// Classifies a raw bitrate (bits per second).
    pub fn from_bitrate(bitrate: u64) -> Self {
        if bitrate >= FULL_HD_MIN_BITRATE {
            Quality::FullHd
        } else if bitrate >= HD_MIN_BITRATE {
            Quality::Hd
        } else if bitrate >= SD_MIN_BITRATE {
            Quality::Sd
        } else {
            Quality::Low
        }
    }

    /// Classifies a frame height in pixels.
    pub fn from_height(height: u32) -> Self {
        match height {
            h if h >= 1080 => Quality::FullHd,
            h if h >= 720 => Quality::Hd,
            h if h >= 480 => Quality::Sd,
            _ => Quality::Low,
        }
    }

    /// Nominal resolution label for the bucket.
    pub fn nominal_resolution(&self) -> &'static str {
        match self {
            Quality::Low => "360p",
            Quality::Sd => "480p",
            Quality::Hd => "720p",
            Quality::FullHd => "1080p",
        }
    }
}

/// One playable rendition of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoVariant {
    pub url: String,
    pub quality: Quality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl VideoVariant {
    /// Builds a variant from a URL and, when known, its bitrate.
    ///
    /// A bitrate always decides the quality bucket. Without one, a `WxH` hint
    /// in the URL path is used; with neither the variant is labelled SD and
    /// carries no resolution.
    pub fn new(url: impl Into<String>, bitrate: Option<u64>, content_type: &str) -> Self {
        let url = url.into();
        let (quality, resolution) = match bitrate {
            Some(bitrate) => {
                let quality = Quality::from_bitrate(bitrate);
                (quality, Some(quality.nominal_resolution().to_string()))
            }
            None => match height_hint(&url) {
                Some(height) => {
                    let quality = Quality::from_height(height);
                    (quality, Some(quality.nominal_resolution().to_string()))
                }
                None => (Quality::Sd, None),
            },
        };

        Self {
            url,
            quality,
            resolution,
            bitrate,
            content_type: content_type.to_string(),
            file_size: None,
        }
    }

    /// Shorthand for an MP4 variant.
    pub fn mp4(url: impl Into<String>, bitrate: Option<u64>) -> Self {
        Self::new(url, bitrate, MP4_CONTENT_TYPE)
    }

    /// Reclassifies a bitrate-less variant from a known frame height.
    ///
    /// A variant that carries a bitrate keeps its bitrate-derived quality.
    pub fn with_height(mut self, height: Option<u32>) -> Self {
        if let (None, Some(height)) = (self.bitrate, height.filter(|h| *h > 0)) {
            self.quality = Quality::from_height(height);
            self.resolution = Some(self.quality.nominal_resolution().to_string());
        }
        self
    }
}

/// Extracts the frame height from a `/WxH/` path segment.
fn height_hint(url: &str) -> Option<u32> {
    RESOLUTION_HINT
        .captures(url)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// A resolved video: metadata plus its renditions, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub variants: Vec<VideoVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl VideoInfo {
    /// Sorts variants by descending bitrate; variants without one sort last.
    ///
    /// The sort is stable, so equal bitrates keep the order the upstream gave.
    pub fn sort_variants(&mut self) {
        self.variants
            .sort_by(|a, b| b.bitrate.unwrap_or(0).cmp(&a.bitrate.unwrap_or(0)));
    }

    /// Drops variants without a URL and reports whether any remain.
    pub fn retain_playable(&mut self) -> bool {
        self.variants.retain(|v| !v.url.trim().is_empty());
        !self.variants.is_empty()
    }

    /// The best rendition, if any.
    pub fn best_variant(&self) -> Option<&VideoVariant> {
        self.variants.first()
    }

    /// URL of the best rendition (empty if there is none).
    pub fn mp4_url(&self) -> &str {
        self.best_variant().map(|v| v.url.as_str()).unwrap_or("")
    }

    /// File size of the best rendition, or 0 when unknown.
    pub fn size_approx(&self) -> u64 {
        self.best_variant().and_then(|v| v.file_size).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_quality_from_bitrate_thresholds() {
        let cases = [
            (2_500_000, Quality::FullHd, "1080p"),
            (2_000_000, Quality::FullHd, "1080p"),
            (1_200_000, Quality::Hd, "720p"),
            (1_000_000, Quality::Hd, "720p"),
            (600_000, Quality::Sd, "480p"),
            (500_000, Quality::Sd, "480p"),
            (100_000, Quality::Low, "360p"),
            (0, Quality::Low, "360p"),
        ];
        for (bitrate, quality, resolution) in cases {
            let variant = VideoVariant::mp4("https://video.example/v.mp4", Some(bitrate));
            assert_eq!(variant.quality, quality, "bitrate {}", bitrate);
            assert_eq!(variant.resolution.as_deref(), Some(resolution));
        }
    }

    #[test]
    fn test_quality_from_url_hint() {
        let variant = VideoVariant::mp4(
            "https://video.twimg.com/ext_tw_video/1/pu/vid/avc1/1280x720/abc.mp4",
            None,
        );
        assert_eq!(variant.quality, Quality::Hd);
        assert_eq!(variant.resolution.as_deref(), Some("720p"));
    }

    #[test]
    fn test_quality_without_any_hint() {
        let variant = VideoVariant::mp4("https://cdn.example/video.mp4", None);
        assert_eq!(variant.quality, Quality::Sd);
        assert_eq!(variant.resolution, None);
    }

    #[test]
    fn test_with_height_only_applies_without_bitrate() {
        let variant = VideoVariant::mp4("https://cdn.example/a.mp4", None).with_height(Some(1080));
        assert_eq!(variant.quality, Quality::FullHd);
        let variant =
            VideoVariant::mp4("https://cdn.example/a.mp4", Some(600_000)).with_height(Some(1080));
        assert_eq!(variant.quality, Quality::Sd);
        let variant = VideoVariant::mp4("https://cdn.example/a.mp4", None).with_height(Some(0));
        assert_eq!(variant.resolution, None);
    }

    #[test]
    fn test_sort_variants_descending_and_stable() {
        let mut info = VideoInfo {
            id: "1".into(),
            title: "t".into(),
            thumbnail: None,
            variants: vec![
                VideoVariant::mp4("https://a/low.mp4", Some(256_000)),
                VideoVariant::mp4("https://a/none.mp4", None),
                VideoVariant::mp4("https://a/high.mp4", Some(2_176_000)),
                VideoVariant::mp4("https://a/mid1.mp4", Some(832_000)),
                VideoVariant::mp4("https://a/mid2.mp4", Some(832_000)),
            ],
            author: None,
            duration: None,
        };
        info.sort_variants();
        let urls: Vec<&str> = info.variants.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a/high.mp4",
                "https://a/mid1.mp4",
                "https://a/mid2.mp4",
                "https://a/low.mp4",
                "https://a/none.mp4",
            ]
        );
        assert_eq!(info.mp4_url(), "https://a/high.mp4");
    }

    #[test]
    fn test_retain_playable_drops_empty_urls() {
        let mut info = VideoInfo {
            id: "1".into(),
            title: "t".into(),
            thumbnail: None,
            variants: vec![VideoVariant::mp4("  ", Some(1))],
            author: None,
            duration: None,
        };
        assert!(!info.retain_playable());
        assert_eq!(info.mp4_url(), "");
        assert_eq!(info.size_approx(), 0);
    }

    #[test]
    fn test_network_string_forms() {
        assert_eq!(Network::X.to_string(), "x");
        assert_eq!(Network::Instagram.to_string(), "instagram");
        assert_eq!(Network::from_str("x").ok(), Some(Network::X));
        assert!(Network::from_str("tiktok").is_err());
        assert_eq!(
            serde_json::to_string(&Network::Instagram).unwrap(),
            "\"instagram\""
        );
    }

    #[test]
    fn test_variant_serializes_camel_case() {
        let mut variant = VideoVariant::mp4("https://a/v.mp4", Some(1_200_000));
        variant.file_size = Some(42);
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["quality"], "HD");
        assert_eq!(json["contentType"], "video/mp4");
        assert_eq!(json["fileSize"], 42);
        assert_eq!(json["resolution"], "720p");
    }
}
