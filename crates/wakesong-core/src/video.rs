//! Video-identifier extraction and best-effort metadata enrichment.
//!
//! Enrichment is total by contract: every failure — malformed URL, network
//! error, unexpected response shape — collapses to the fallback title (and
//! an absent thumbnail) for that row only. Nothing here mutates the backend.

use anyhow::{Context, Result};
use futures_util::future::join_all;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::model::{EnrichedSong, SongRequest};

/// Sentinel title for rows whose video could not be resolved.
pub const FALLBACK_TITLE: &str = "Unknown Video";

/// Host marker for short links that carry the id as the first path segment.
const SHORT_LINK_HOST: &str = "youtu.be";

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Extract the video identifier from a request URL.
///
/// Short-link hosts carry the id as the first path segment; standard hosts
/// as the `v` query parameter. Malformed input yields `None`, never an error.
pub fn video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    if host.contains(SHORT_LINK_HOST) {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    } else {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Deterministic thumbnail URL for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}

/// Title lookup client for the hosted video-metadata API.
///
/// Cloning is cheap; clones share one underlying HTTP client.
#[derive(Clone)]
pub struct VideoLookup {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

impl VideoLookup {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(api_key, VIDEOS_ENDPOINT)
    }

    /// Point lookups at a different videos endpoint (tests, proxies).
    pub fn with_endpoint(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            endpoint: endpoint.into(),
        }
    }

    /// Resolve a display title for `video_id`.
    ///
    /// Total: any failure, including an absent id, yields [`FALLBACK_TITLE`].
    /// Without an API key the request still fires and the rejected response
    /// falls back the same way.
    pub async fn title(&self, video_id: Option<&str>) -> String {
        let Some(id) = video_id else {
            return FALLBACK_TITLE.to_string();
        };
        match self.fetch_title(id).await {
            Ok(Some(title)) => title,
            Ok(None) => FALLBACK_TITLE.to_string(),
            Err(e) => {
                debug!("[video] title lookup failed for {id}: {e:#}");
                FALLBACK_TITLE.to_string()
            }
        }
    }

    async fn fetch_title(&self, id: &str) -> Result<Option<String>> {
        let mut url = Url::parse(&self.endpoint).context("invalid videos endpoint")?;
        url.query_pairs_mut()
            .append_pair("id", id)
            .append_pair("part", "snippet");
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("failed to reach videos endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("videos endpoint returned status: {}", response.status());
        }

        let data: VideoListResponse = response
            .json()
            .await
            .context("failed to parse videos response")?;

        Ok(data
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .and_then(|snippet| snippet.title))
    }
}

/// Enrich one query's result set.
///
/// All lookups run as a single concurrently-pending batch; the batch returns
/// once every lookup has settled, each row falling back independently.
pub async fn enrich(
    lookup: &VideoLookup,
    rows: Vec<SongRequest>,
    with_thumbnails: bool,
) -> Vec<EnrichedSong> {
    let futures = rows.into_iter().map(|request| async move {
        let id = request.url.as_deref().and_then(video_id);
        let title = lookup.title(id.as_deref()).await;
        let thumbnail = if with_thumbnails {
            id.as_deref().map(thumbnail_url)
        } else {
            None
        };
        EnrichedSong {
            request,
            title,
            thumbnail,
        }
    });
    join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_link_takes_first_path_segment() {
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        // Query params on a short link don't change the id.
        assert_eq!(video_id("https://youtu.be/abc123?t=42").as_deref(), Some("abc123"));
        assert_eq!(video_id("https://www.youtu.be/xyz").as_deref(), Some("xyz"));
    }

    #[test]
    fn standard_host_takes_v_parameter() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            video_id("https://www.youtube.com/watch?list=PL1&v=abc&t=9").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn unusable_urls_yield_no_id() {
        assert_eq!(video_id("not a url"), None);
        assert_eq!(video_id(""), None);
        // Short link with an empty path.
        assert_eq!(video_id("https://youtu.be/"), None);
        // Standard host without a v parameter, or with an empty one.
        assert_eq!(video_id("https://www.youtube.com/playlist?list=PL1"), None);
        assert_eq!(video_id("https://www.youtube.com/watch?v="), None);
        // Scheme-relative / pathless inputs.
        assert_eq!(video_id("mailto:someone@example.com"), None);
    }

    #[test]
    fn thumbnail_is_keyed_by_id() {
        assert_eq!(
            thumbnail_url("abc123"),
            "https://img.youtube.com/vi/abc123/hqdefault.jpg"
        );
    }

    #[test]
    fn malformed_response_body_is_a_miss() {
        // Shape checks only; the network path is covered by the
        // integration tests with a mock endpoint.
        let empty: VideoListResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());

        let no_snippet: VideoListResponse =
            serde_json::from_str(r#"{"items":[{"kind":"youtube#video"}]}"#).unwrap();
        assert!(no_snippet.items[0].snippet.is_none());

        let no_title: VideoListResponse =
            serde_json::from_str(r#"{"items":[{"snippet":{"channelTitle":"x"}}]}"#).unwrap();
        assert!(no_title.items[0].snippet.as_ref().unwrap().title.is_none());
    }
}
