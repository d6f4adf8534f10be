use serde::Serialize;

pub mod local;
pub mod youtube;

pub use local::{accept_file, FileCandidate, FileHandle, FileRejection, MediaFormat, MAX_UPLOAD_BYTES};
pub use youtube::extract_video_id;

use crate::error::YoutubeError;

/// Raw user input as held by the session, before resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawInput {
    #[default]
    Empty,
    Url(String),
    File(FileHandle),
}

impl RawInput {
    /// Whether there is anything to submit
    pub fn is_present(&self) -> bool {
        match self {
            RawInput::Empty => false,
            RawInput::Url(url) => !url.is_empty(),
            RawInput::File(_) => true,
        }
    }
}

/// Normalized description of the media to summarize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    Youtube { video_id: String },
    File(FileHandle),
    None,
}

impl MediaReference {
    /// Short human-readable description used in reports and logs
    pub fn describe(&self) -> String {
        match self {
            MediaReference::Youtube { video_id } => format!("YouTube video {}", video_id),
            MediaReference::File(handle) => format!("File {}", handle.name()),
            MediaReference::None => "no input".to_string(),
        }
    }
}

/// Serializable summary of a [`MediaReference`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceInfo {
    Youtube { video_id: String },
    File { name: String, size: u64, mime_type: String },
    None,
}

impl From<&MediaReference> for SourceInfo {
    fn from(media: &MediaReference) -> Self {
        match media {
            MediaReference::Youtube { video_id } => SourceInfo::Youtube {
                video_id: video_id.clone(),
            },
            MediaReference::File(handle) => SourceInfo::File {
                name: handle.name().to_string(),
                size: handle.size(),
                mime_type: handle.mime_type().to_string(),
            },
            MediaReference::None => SourceInfo::None,
        }
    }
}

/// Turn session input into a [`MediaReference`].
///
/// Files were already admitted when they entered the session, so only URLs can fail here.
pub fn resolve(input: &RawInput) -> Result<MediaReference, YoutubeError> {
    match input {
        RawInput::Empty => Ok(MediaReference::None),
        RawInput::Url(url) if url.is_empty() => Ok(MediaReference::None),
        RawInput::Url(url) => {
            let video_id = extract_video_id(url)?;
            tracing::debug!("Resolved YouTube video ID: {}", video_id);
            Ok(MediaReference::Youtube { video_id })
        }
        RawInput::File(handle) => Ok(MediaReference::File(handle.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let media = resolve(&RawInput::Url("https://youtu.be/abc".into())).unwrap();
        assert_eq!(media, MediaReference::Youtube { video_id: "abc".into() });
    }

    #[test]
    fn test_resolve_invalid_url() {
        assert_eq!(
            resolve(&RawInput::Url("https://example.com/watch?v=abc".into())),
            Err(YoutubeError::InvalidUrl)
        );
    }

    #[test]
    fn test_resolve_empty_inputs() {
        assert_eq!(resolve(&RawInput::Empty), Ok(MediaReference::None));
        assert_eq!(resolve(&RawInput::Url(String::new())), Ok(MediaReference::None));
        assert!(!RawInput::Url(String::new()).is_present());
        assert!(!RawInput::Empty.is_present());
    }

    #[test]
    fn test_resolve_file() {
        let handle = local::test_handle("talk.mp3");
        let media = resolve(&RawInput::File(handle.clone())).unwrap();
        assert_eq!(media, MediaReference::File(handle));
        assert_eq!(media.describe(), "File talk.mp3");
    }
}
