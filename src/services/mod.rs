//! Outbound collaborators of the summary pipeline.
//!
//! Each service sits behind an async trait so the pipeline can be driven by
//! mocks in tests and by the HTTP clients in [`youtube`] and [`huggingface`]
//! in the binary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod huggingface;
pub mod youtube;

pub use huggingface::HuggingFaceClient;
pub use youtube::YoutubeDataClient;

use crate::error::{SummarizationError, TranscriptionError, YoutubeError};
use crate::resolver::FileHandle;

/// Video metadata used to assemble a transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub channel_title: String,

    /// RFC 3339 publish timestamp as returned by the API
    pub published_at: String,

    /// Counts arrive as decimal strings; likes may be hidden
    pub view_count: Option<String>,
    pub like_count: Option<String>,
}

/// One caption track listed for a video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub id: String,
    pub language: Option<String>,
    pub name: Option<String>,
}

/// Looks up video metadata by id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoInfoService: Send + Sync {
    /// `Ok(None)` when the service knows no such video
    async fn fetch_video(&self, video_id: &str) -> Result<Option<VideoDetails>, YoutubeError>;
}

/// Lists caption tracks for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionsService: Send + Sync {
    async fn list_captions(&self, video_id: &str) -> Result<Vec<CaptionTrack>, YoutubeError>;
}

/// Speech-to-text for an admitted local file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, file: &FileHandle) -> Result<String, TranscriptionError>;
}

/// Text summarization
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError>;
}
