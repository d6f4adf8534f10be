//! Session state and the reducer that owns every transition.
//!
//! The host feeds [`SessionEvent`]s into [`reduce`]. A submission yields an
//! [`Effect`] which the host performs against a [`SummaryPipeline`] and feeds
//! back as `PipelineSucceeded` or `PipelineFailed`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCategory, PipelineError};
use crate::pipeline::{PipelineOutput, SummaryPipeline, SummaryText};
use crate::resolver::{self, FileHandle, MediaReference, RawInput, SourceInfo};

/// Identifies one submission so stale outcomes can be dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunTicket(Uuid);

impl RunTicket {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        ticket: RunTicket,
    },
    Success(SummaryText),
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub input: RawInput,
    pub request: RequestState,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self.request, RequestState::Loading { .. })
    }

    /// Submit is available when there is input and no run in flight
    pub fn can_submit(&self) -> bool {
        self.input.is_present() && !self.is_loading()
    }

    /// Reset is offered whenever there is input
    pub fn can_reset(&self) -> bool {
        self.input.is_present()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The URL field changed
    InputChanged(String),
    /// A file passed admission checks
    FileDropped(FileHandle),
    SubmitRequested,
    PipelineSucceeded {
        ticket: RunTicket,
        summary: SummaryText,
    },
    PipelineFailed {
        ticket: RunTicket,
        category: ErrorCategory,
        message: String,
    },
    ResetRequested,
}

/// Work the host must perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunPipeline { ticket: RunTicket, input: RawInput },
}

/// Apply one event to the session state
pub fn reduce(state: SessionState, event: SessionEvent) -> (SessionState, Option<Effect>) {
    match event {
        SessionEvent::InputChanged(text) => {
            let request = match state.request {
                RequestState::Failed { .. } => RequestState::Idle,
                other => other,
            };
            (
                SessionState {
                    input: RawInput::Url(text),
                    request,
                },
                None,
            )
        }
        SessionEvent::FileDropped(handle) => (
            SessionState {
                input: RawInput::File(handle),
                ..state
            },
            None,
        ),
        SessionEvent::SubmitRequested => {
            if state.is_loading() {
                tracing::debug!("Ignoring submit while a run is in flight");
                return (state, None);
            }

            if !state.input.is_present() {
                let err = PipelineError::NoInput;
                let request = RequestState::Failed {
                    category: err.category(),
                    message: err.to_string(),
                };
                return (SessionState { request, ..state }, None);
            }

            let ticket = RunTicket::fresh();
            let effect = Effect::RunPipeline {
                ticket,
                input: state.input.clone(),
            };
            (
                SessionState {
                    request: RequestState::Loading { ticket },
                    ..state
                },
                Some(effect),
            )
        }
        SessionEvent::PipelineSucceeded { ticket, summary } => {
            if !state.awaits(ticket) {
                tracing::debug!("Dropping stale result for run {}", ticket);
                return (state, None);
            }
            (
                SessionState {
                    request: RequestState::Success(summary),
                    ..state
                },
                None,
            )
        }
        SessionEvent::PipelineFailed {
            ticket,
            category,
            message,
        } => {
            if !state.awaits(ticket) {
                tracing::debug!("Dropping stale failure for run {}", ticket);
                return (state, None);
            }
            (
                SessionState {
                    request: RequestState::Failed { category, message },
                    ..state
                },
                None,
            )
        }
        SessionEvent::ResetRequested => (SessionState::default(), None),
    }
}

impl SessionState {
    fn awaits(&self, ticket: RunTicket) -> bool {
        matches!(self.request, RequestState::Loading { ticket: current } if current == ticket)
    }
}

/// What performing an [`Effect`] produced
#[derive(Debug)]
pub struct RunOutcome {
    /// Event to feed back into the session
    pub event: SessionEvent,
    /// The resolved input, `SourceInfo::None` when resolution failed
    pub source: SourceInfo,
    /// Transcript and summary, present only on success
    pub output: Option<PipelineOutput>,
}

impl Effect {
    /// Resolve the input and run the pipeline, returning the outcome event
    /// together with the resolved source and full pipeline output.
    pub async fn perform(self, pipeline: &SummaryPipeline) -> RunOutcome {
        let Effect::RunPipeline { ticket, input } = self;

        let (source, result) = match resolver::resolve(&input) {
            Ok(media) => (SourceInfo::from(&media), run_resolved(pipeline, &media).await),
            Err(err) => (SourceInfo::None, Err(PipelineError::from(err))),
        };

        match result {
            Ok(output) => RunOutcome {
                event: SessionEvent::PipelineSucceeded {
                    ticket,
                    summary: output.summary.clone(),
                },
                source,
                output: Some(output),
            },
            Err(err) => {
                tracing::warn!("Run {} failed ({}): {}", ticket, err.category(), err);
                RunOutcome {
                    event: SessionEvent::PipelineFailed {
                        ticket,
                        category: err.category(),
                        message: err.to_string(),
                    },
                    source,
                    output: None,
                }
            }
        }
    }
}

async fn run_resolved(
    pipeline: &SummaryPipeline,
    media: &MediaReference,
) -> Result<PipelineOutput, PipelineError> {
    tracing::info!("Starting run for {}", media.describe());
    pipeline.run_detailed(media).await
}

/// Owns a [`SessionState`] and threads it through [`reduce`]
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Option<Effect> {
        let (next, effect) = reduce(std::mem::take(&mut self.state), event);
        self.state = next;
        effect
    }
}
