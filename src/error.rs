use serde::{Deserialize, Serialize};

/// Message shown when a failure falls outside the known taxonomy.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// User-facing classification of a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidUrl,
    NotFound,
    NoCaptions,
    QuotaExceeded,
    InvalidCredentials,
    PayloadTooLarge,
    InvalidResponse,
    TransportError,
    NoInput,
    Unexpected,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::InvalidUrl => "invalid-url",
            ErrorCategory::NotFound => "not-found",
            ErrorCategory::NoCaptions => "no-captions",
            ErrorCategory::QuotaExceeded => "quota-exceeded",
            ErrorCategory::InvalidCredentials => "invalid-credentials",
            ErrorCategory::PayloadTooLarge => "payload-too-large",
            ErrorCategory::InvalidResponse => "invalid-response",
            ErrorCategory::TransportError => "transport-error",
            ErrorCategory::NoInput => "no-input",
            ErrorCategory::Unexpected => "unexpected",
        };
        write!(f, "{}", name)
    }
}

/// Failures of the YouTube stage (URL resolution, metadata and captions lookups)
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum YoutubeError {
    #[error("Please enter a valid YouTube URL")]
    InvalidUrl,

    #[error("Video not found")]
    NotFound,

    #[error("No captions found for this video")]
    NoCaptions,

    #[error("YouTube API quota exceeded or invalid API key")]
    QuotaExceeded,

    #[error("YouTube API error: {0}")]
    Api(String),
}

/// Failures of the transcription upload
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("Invalid Hugging Face API key")]
    InvalidCredentials,

    #[error("File too large. Please use a smaller file.")]
    PayloadTooLarge,

    #[error("Invalid response from transcription API")]
    InvalidResponse,

    #[error("Failed to read media file: {0}")]
    ReadFailed(String),

    #[error("Transcription API error: {0}")]
    Api(String),
}

/// Failures of the summarization call
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizationError {
    #[error("Invalid Hugging Face API key")]
    InvalidCredentials,

    #[error("Invalid response from summarization API")]
    InvalidResponse,

    #[error("Summarization API error: {0}")]
    Api(String),
}

/// Terminal failure of one pipeline run.
///
/// `Display` renders the exact message shown to the user, including the
/// stage prefix for the YouTube and transcription stages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Please provide a YouTube URL or upload a file")]
    NoInput,

    #[error("YouTube error: {0}")]
    Youtube(#[from] YoutubeError),

    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::NoInput => ErrorCategory::NoInput,
            PipelineError::Youtube(err) => match err {
                YoutubeError::InvalidUrl => ErrorCategory::InvalidUrl,
                YoutubeError::NotFound => ErrorCategory::NotFound,
                YoutubeError::NoCaptions => ErrorCategory::NoCaptions,
                YoutubeError::QuotaExceeded => ErrorCategory::QuotaExceeded,
                YoutubeError::Api(_) => ErrorCategory::TransportError,
            },
            PipelineError::Transcription(err) => match err {
                TranscriptionError::InvalidCredentials => ErrorCategory::InvalidCredentials,
                TranscriptionError::PayloadTooLarge => ErrorCategory::PayloadTooLarge,
                TranscriptionError::InvalidResponse => ErrorCategory::InvalidResponse,
                TranscriptionError::ReadFailed(_) | TranscriptionError::Api(_) => {
                    ErrorCategory::TransportError
                }
            },
            PipelineError::Summarization(err) => match err {
                SummarizationError::InvalidCredentials => ErrorCategory::InvalidCredentials,
                SummarizationError::InvalidResponse => ErrorCategory::InvalidResponse,
                SummarizationError::Api(_) => ErrorCategory::TransportError,
            },
        }
    }
}

/// Classify an arbitrary host-level error for display.
///
/// Anything that is not a [`PipelineError`] collapses to the generic
/// unexpected-error message.
pub fn classify(err: &anyhow::Error) -> (ErrorCategory, String) {
    match err.downcast_ref::<PipelineError>() {
        Some(pipeline_err) => (pipeline_err.category(), pipeline_err.to_string()),
        None => (ErrorCategory::Unexpected, UNEXPECTED_ERROR_MESSAGE.to_string()),
    }
}

/// Detail text for a transport failure, in the shape the front end shows.
pub(crate) fn transport_detail(err: &reqwest::Error) -> String {
    match err.status() {
        Some(status) => status_detail(status),
        None => err.to_string(),
    }
}

pub(crate) fn status_detail(status: reqwest::StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_messages_carry_stage_prefix() {
        let err = PipelineError::from(YoutubeError::NotFound);
        assert_eq!(err.to_string(), "YouTube error: Video not found");
        assert_eq!(err.category(), ErrorCategory::NotFound);

        let err = PipelineError::from(YoutubeError::Api("Request failed with status code 500".into()));
        assert_eq!(
            err.to_string(),
            "YouTube error: YouTube API error: Request failed with status code 500"
        );
        assert_eq!(err.category(), ErrorCategory::TransportError);
    }

    #[test]
    fn test_transcription_messages_carry_stage_prefix() {
        let err = PipelineError::from(TranscriptionError::PayloadTooLarge);
        assert_eq!(
            err.to_string(),
            "Transcription error: File too large. Please use a smaller file."
        );
        assert_eq!(err.category(), ErrorCategory::PayloadTooLarge);
    }

    #[test]
    fn test_summarization_messages_are_unprefixed() {
        let err = PipelineError::from(SummarizationError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid Hugging Face API key");
        assert_eq!(err.category(), ErrorCategory::InvalidCredentials);

        let err = PipelineError::from(SummarizationError::InvalidResponse);
        assert_eq!(err.to_string(), "Invalid response from summarization API");
    }

    #[test]
    fn test_no_input_message() {
        assert_eq!(
            PipelineError::NoInput.to_string(),
            "Please provide a YouTube URL or upload a file"
        );
    }

    #[test]
    fn test_classify_falls_back_to_unexpected() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(
            classify(&err),
            (ErrorCategory::Unexpected, UNEXPECTED_ERROR_MESSAGE.to_string())
        );

        let err = anyhow::Error::new(PipelineError::from(YoutubeError::QuotaExceeded));
        assert_eq!(
            classify(&err),
            (
                ErrorCategory::QuotaExceeded,
                "YouTube error: YouTube API quota exceeded or invalid API key".to_string()
            )
        );
    }
}
