//! File size enrichment for the winning variant.

use log::debug;
use reqwest::header::CONTENT_LENGTH;

use crate::models::VideoInfo;
use crate::security::ProbeClient;

/// Fills in the best variant's `file_size` from a `HEAD` request.
///
/// Does nothing when the size is already known or the variant URL is refused
/// by `probe`. Failures are logged and ignored.
pub async fn probe_file_size(info: &mut VideoInfo, probe: &ProbeClient) {
    let Some(best) = info.variants.first_mut() else {
        return;
    };
    if best.file_size.is_some() {
        return;
    }

    let request = match probe.head(&best.url) {
        Ok(request) => request,
        Err(e) => {
            debug!("Not probing size of {}: {}", best.url, e);
            return;
        }
    };

    let response = match request.send().await {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            debug!(
                "Size probe of {} answered {}",
                best.url,
                response.status().as_u16()
            );
            return;
        }
        Err(e) => {
            debug!("Size probe of {} failed: {}", best.url, e);
            return;
        }
    };

    // reqwest reports a zero body length for HEAD, so read the header itself
    best.file_size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|len| *len > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::VideoVariant;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn local() -> ProbeClient {
        ProbeClient::unguarded(reqwest::Client::new())
    }

    fn info(url: String) -> VideoInfo {
        VideoInfo {
            id: "1".into(),
            title: "t".into(),
            thumbnail: None,
            variants: vec![VideoVariant::mp4(url, Some(1_000_000))],
            author: None,
            duration: None,
        }
    }

    #[tokio::test]
    async fn test_probe_reads_content_length() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/v.mp4"))
                .respond_with(status_code(200).append_header("Content-Length", "123456")),
        );
        let mut video = info(server.url_str("/v.mp4"));
        probe_file_size(&mut video, &local()).await;
        assert_eq!(video.size_approx(), 123_456);
    }

    #[tokio::test]
    async fn test_probe_failure_leaves_size_unknown() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/gone.mp4"))
                .respond_with(status_code(404)),
        );
        let mut video = info(server.url_str("/gone.mp4"));
        probe_file_size(&mut video, &local()).await;
        assert_eq!(video.size_approx(), 0);
    }

    #[tokio::test]
    async fn test_internal_variant_url_is_not_probed() {
        // No expectations: a HEAD reaching the server fails verification on drop
        let server = Server::run();
        let port = server.addr().port();
        let probe = ProbeClient::new(&Config::default()).unwrap();

        for url in [
            format!("http://[::1]:{}/internal/admin.mp4", port),
            server.url_str("/internal/admin.mp4"),
            format!("http://localhost:{}/internal/admin.mp4", port),
        ] {
            let mut video = info(url);
            probe_file_size(&mut video, &probe).await;
            assert_eq!(video.size_approx(), 0);
        }
    }
}
