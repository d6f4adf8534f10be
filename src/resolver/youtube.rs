use url::Url;

use crate::error::YoutubeError;

/// Hosts serving `watch?v=` and `/embed/` URLs
const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com"];

/// Short-link host, the video id is the whole path
const SHORT_HOST: &str = "youtu.be";

/// Check whether a host is one of the recognized YouTube hosts
pub fn is_youtube_host(host: &str) -> bool {
    WATCH_HOSTS.contains(&host) || host == SHORT_HOST
}

/// Extract the video identifier from a YouTube URL.
///
/// Recognized shapes, tried in order:
/// - `youtube.com/watch?v=<id>` (first `v` parameter, must be non-empty)
/// - `youtu.be/<id>` (everything after the leading slash)
/// - `youtube.com/embed/<id>` (third `/`-separated path segment)
pub fn extract_video_id(input: &str) -> Result<String, YoutubeError> {
    let parsed = Url::parse(input).map_err(|_| YoutubeError::InvalidUrl)?;
    let host = parsed.host_str().unwrap_or_default();
    if !is_youtube_host(host) {
        tracing::debug!("Not a YouTube host: {}", host);
        return Err(YoutubeError::InvalidUrl);
    }

    if WATCH_HOSTS.contains(&host) {
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
            if !id.is_empty() {
                return Ok(id.into_owned());
            }
        }
    }

    if host == SHORT_HOST {
        let path = parsed.path();
        let id = path.strip_prefix('/').unwrap_or(path);
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    if WATCH_HOSTS.contains(&host) && parsed.path().starts_with("/embed/") {
        if let Some(id) = parsed.path().split('/').nth(2).filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }
    }

    tracing::debug!("Could not extract video ID from URL: {}", input);
    Err(YoutubeError::InvalidUrl)
}
