//! Video Summarizer - summarize YouTube videos and local media files
//!
//! This library resolves user input (a YouTube URL or an uploaded audio/video file)
//! into a media reference, obtains a transcript from the YouTube Data API or a
//! speech-to-text model, and summarizes it with a hosted Hugging Face model.

pub mod cli;
pub mod config;
pub mod error;
pub mod locale;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod services;
pub mod session;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use error::{ErrorCategory, PipelineError, SummarizationError, TranscriptionError, YoutubeError};
pub use pipeline::{PipelineOutput, SummaryPipeline, SummaryText, TranscriptText};
pub use resolver::{FileHandle, MediaReference, RawInput};
pub use session::{reduce, Effect, RequestState, RunOutcome, Session, SessionEvent, SessionState};
