use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub mod transcript;

pub use transcript::assemble_metadata_transcript;

use crate::config::Config;
use crate::error::{PipelineError, YoutubeError};
use crate::locale::Locale;
use crate::resolver::{FileHandle, MediaReference};
use crate::services::{
    CaptionsService, HuggingFaceClient, Summarizer, Transcriber, VideoInfoService,
    YoutubeDataClient,
};

/// Text handed to the summarizer
pub type TranscriptText = String;

/// Text returned by the summarizer
pub type SummaryText = String;

/// Transcript and summary produced by one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub transcript: TranscriptText,
    pub summary: SummaryText,
}

/// Sequential transcript-then-summary pipeline.
///
/// Holds only its collaborators; every run is independent.
pub struct SummaryPipeline {
    video_info: Box<dyn VideoInfoService>,
    captions: Box<dyn CaptionsService>,
    transcriber: Box<dyn Transcriber>,
    summarizer: Box<dyn Summarizer>,
    locale: Locale,
}

impl SummaryPipeline {
    pub fn new(
        video_info: Box<dyn VideoInfoService>,
        captions: Box<dyn CaptionsService>,
        transcriber: Box<dyn Transcriber>,
        summarizer: Box<dyn Summarizer>,
        locale: Locale,
    ) -> Self {
        Self {
            video_info,
            captions,
            transcriber,
            summarizer,
            locale,
        }
    }

    /// Build a pipeline wired to the YouTube Data API and Hugging Face
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("video-summarizer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let youtube = YoutubeDataClient::new(
            client.clone(),
            config.youtube.api_base.clone(),
            config.youtube.api_key.clone(),
        );
        let huggingface = HuggingFaceClient::new(client, &config.huggingface);

        Ok(Self::new(
            Box::new(youtube.clone()),
            Box::new(youtube),
            Box::new(huggingface.clone()),
            Box::new(huggingface),
            config.app.locale,
        ))
    }

    /// Produce a summary for `media`
    pub async fn run(&self, media: &MediaReference) -> Result<SummaryText, PipelineError> {
        self.run_detailed(media).await.map(|output| output.summary)
    }

    /// Produce a summary for `media`, keeping the intermediate transcript
    pub async fn run_detailed(&self, media: &MediaReference) -> Result<PipelineOutput, PipelineError> {
        let transcript = match media {
            MediaReference::Youtube { video_id } => self.youtube_transcript(video_id).await?,
            MediaReference::File(handle) => self.file_transcript(handle).await?,
            MediaReference::None => return Err(PipelineError::NoInput),
        };

        tracing::info!("Summarizing transcript ({} characters)", transcript.len());
        let summary = self.summarizer.summarize(&transcript).await?;
        tracing::info!("Summary ready");

        Ok(PipelineOutput {
            transcript,
            summary,
        })
    }

    /// Metadata lookup, then caption-existence check, then template assembly
    async fn youtube_transcript(&self, video_id: &str) -> Result<TranscriptText, YoutubeError> {
        tracing::info!("Fetching metadata for video {}", video_id);
        let details = self
            .video_info
            .fetch_video(video_id)
            .await?
            .ok_or(YoutubeError::NotFound)?;

        tracing::info!("Checking caption tracks for video {}", video_id);
        let tracks = self.captions.list_captions(video_id).await?;
        if tracks.is_empty() {
            return Err(YoutubeError::NoCaptions);
        }
        tracing::debug!("Found {} caption track(s)", tracks.len());

        Ok(assemble_metadata_transcript(&details, self.locale))
    }

    async fn file_transcript(&self, handle: &FileHandle) -> Result<TranscriptText, PipelineError> {
        tracing::info!("Transcribing {}", handle.name());
        Ok(self.transcriber.transcribe(handle).await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{ErrorCategory, SummarizationError, TranscriptionError};
    use crate::resolver::local::test_handle;
    use crate::services::{
        CaptionTrack, MockCaptionsService, MockSummarizer, MockTranscriber,
        MockVideoInfoService, VideoDetails,
    };
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    pub(crate) struct Mocks {
        pub video_info: MockVideoInfoService,
        pub captions: MockCaptionsService,
        pub transcriber: MockTranscriber,
        pub summarizer: MockSummarizer,
    }

    impl Mocks {
        pub(crate) fn new() -> Self {
            Self {
                video_info: MockVideoInfoService::new(),
                captions: MockCaptionsService::new(),
                transcriber: MockTranscriber::new(),
                summarizer: MockSummarizer::new(),
            }
        }

        pub(crate) fn build(self) -> SummaryPipeline {
            SummaryPipeline::new(
                Box::new(self.video_info),
                Box::new(self.captions),
                Box::new(self.transcriber),
                Box::new(self.summarizer),
                Locale::EnUs,
            )
        }
    }

    pub(crate) fn sample_details() -> VideoDetails {
        VideoDetails {
            title: "T".into(),
            description: "D".into(),
            channel_title: "C".into(),
            published_at: "2024-01-02T00:00:00Z".into(),
            view_count: Some("1234".into()),
            like_count: Some("5".into()),
        }
    }

    fn one_track() -> Vec<CaptionTrack> {
        vec![CaptionTrack {
            id: "cap1".into(),
            language: Some("en".into()),
            name: None,
        }]
    }

    fn youtube(id: &str) -> MediaReference {
        MediaReference::Youtube {
            video_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn no_input_fails_without_calls() {
        let mut mocks = Mocks::new();
        mocks.video_info.expect_fetch_video().never();
        mocks.captions.expect_list_captions().never();
        mocks.transcriber.expect_transcribe().never();
        mocks.summarizer.expect_summarize().never();

        let err = mocks.build().run(&MediaReference::None).await.unwrap_err();
        assert_eq!(err, PipelineError::NoInput);
        assert_eq!(err.category(), ErrorCategory::NoInput);
    }

    #[tokio::test]
    async fn youtube_path_summarizes_metadata_block() {
        let mut mocks = Mocks::new();
        mocks
            .video_info
            .expect_fetch_video()
            .with(eq("abc"))
            .times(1)
            .returning(|_| Ok(Some(sample_details())));
        mocks
            .captions
            .expect_list_captions()
            .with(eq("abc"))
            .times(1)
            .returning(|_| Ok(one_track()));
        mocks
            .summarizer
            .expect_summarize()
            .with(eq(
                "Title: T\n\nChannel: C\nPublished: 1/2/2024\nViews: 1,234\nLikes: 5\n\nDescription:\nD",
            ))
            .times(1)
            .returning(|_| Ok("S".to_string()));
        mocks.transcriber.expect_transcribe().never();

        let summary = assert_ok!(mocks.build().run(&youtube("abc")).await);
        assert_eq!(summary, "S");
    }

    #[tokio::test]
    async fn missing_video_skips_captions() {
        let mut mocks = Mocks::new();
        mocks.video_info.expect_fetch_video().returning(|_| Ok(None));
        mocks.captions.expect_list_captions().never();
        mocks.summarizer.expect_summarize().never();

        let err = assert_err!(mocks.build().run(&youtube("gone")).await);
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "YouTube error: Video not found");
    }

    #[tokio::test]
    async fn missing_captions_skip_summarization() {
        let mut mocks = Mocks::new();
        mocks
            .video_info
            .expect_fetch_video()
            .returning(|_| Ok(Some(sample_details())));
        mocks.captions.expect_list_captions().returning(|_| Ok(Vec::new()));
        mocks.summarizer.expect_summarize().never();

        let err = assert_err!(mocks.build().run(&youtube("abc")).await);
        assert_eq!(err.category(), ErrorCategory::NoCaptions);
        assert_eq!(err.to_string(), "YouTube error: No captions found for this video");
    }

    #[tokio::test]
    async fn quota_errors_surface_from_either_lookup() {
        let mut mocks = Mocks::new();
        mocks
            .video_info
            .expect_fetch_video()
            .returning(|_| Err(YoutubeError::QuotaExceeded));
        mocks.captions.expect_list_captions().never();
        let err = assert_err!(mocks.build().run(&youtube("abc")).await);
        assert_eq!(err.category(), ErrorCategory::QuotaExceeded);

        let mut mocks = Mocks::new();
        mocks
            .video_info
            .expect_fetch_video()
            .returning(|_| Ok(Some(sample_details())));
        mocks
            .captions
            .expect_list_captions()
            .returning(|_| Err(YoutubeError::QuotaExceeded));
        mocks.summarizer.expect_summarize().never();
        let err = assert_err!(mocks.build().run(&youtube("abc")).await);
        assert_eq!(
            err.to_string(),
            "YouTube error: YouTube API quota exceeded or invalid API key"
        );
    }

    #[tokio::test]
    async fn file_path_transcribes_then_summarizes() {
        let mut mocks = Mocks::new();
        mocks.video_info.expect_fetch_video().never();
        mocks
            .transcriber
            .expect_transcribe()
            .times(1)
            .returning(|_| Ok("spoken words".to_string()));
        mocks
            .summarizer
            .expect_summarize()
            .with(eq("spoken words"))
            .returning(|_| Ok("gist".to_string()));

        let output = assert_ok!(
            mocks
                .build()
                .run_detailed(&MediaReference::File(test_handle("memo.mp3")))
                .await
        );
        assert_eq!(output.transcript, "spoken words");
        assert_eq!(output.summary, "gist");
    }

    #[tokio::test]
    async fn transcription_failure_is_prefixed() {
        let mut mocks = Mocks::new();
        mocks
            .transcriber
            .expect_transcribe()
            .returning(|_| Err(TranscriptionError::PayloadTooLarge));
        mocks.summarizer.expect_summarize().never();

        let err = assert_err!(
            mocks
                .build()
                .run(&MediaReference::File(test_handle("clip.mp4")))
                .await
        );
        assert_eq!(
            err.to_string(),
            "Transcription error: File too large. Please use a smaller file."
        );
    }

    #[tokio::test]
    async fn summarization_failure_is_unprefixed() {
        let mut mocks = Mocks::new();
        mocks
            .transcriber
            .expect_transcribe()
            .returning(|_| Ok("words".to_string()));
        mocks
            .summarizer
            .expect_summarize()
            .returning(|_| Err(SummarizationError::InvalidCredentials));

        let err = assert_err!(
            mocks
                .build()
                .run(&MediaReference::File(test_handle("memo.wav")))
                .await
        );
        assert_eq!(err.to_string(), "Invalid Hugging Face API key");
        assert_eq!(err.category(), ErrorCategory::InvalidCredentials);
    }
}
