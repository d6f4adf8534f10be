use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_summarizer::cli::{Cli, Commands};
use video_summarizer::config::Config;
use video_summarizer::error::classify;
use video_summarizer::output::{self, SummaryReport};
use video_summarizer::pipeline::{PipelineOutput, SummaryPipeline};
use video_summarizer::resolver::{accept_file, FileCandidate, SourceInfo};
use video_summarizer::session::{Effect, RequestState, Session, SessionEvent};
use video_summarizer::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let mut config = Config::load().await?;
    config.apply_overrides(
        cli.youtube_api_key.clone(),
        cli.huggingface_api_key.clone(),
        cli.locale,
    );

    match cli.command {
        Commands::Summarize {
            input,
            output,
            format,
            show_transcript,
        } => {
            let format = match format {
                Some(format) => format,
                None => config.output_format()?,
            };
            let pipeline = SummaryPipeline::from_config(&config)?;
            let mut session = Session::new();

            if let Some(event) = input_event(&input, config.app.max_upload_bytes).await? {
                session.dispatch(event);
            }

            let effect = session.dispatch(SessionEvent::SubmitRequested);
            let (source, run_output) = match effect {
                Some(effect) => drive(&mut session, &pipeline, effect, cli.quiet).await,
                None => (SourceInfo::None, None),
            };

            match &session.state().request {
                RequestState::Success(summary) => {
                    let report = SummaryReport {
                        source,
                        summary: summary.clone(),
                        transcript: run_output
                            .filter(|_| show_transcript)
                            .map(|o| o.transcript),
                        generated_at: chrono::Utc::now(),
                    };
                    match output {
                        Some(path) => {
                            output::save_to_file(&report, &path, &format).await?;
                            println!("Summary saved to: {}", path.display());
                        }
                        None => output::print_to_console(&report, &format)?,
                    }
                }
                RequestState::Failed { message, .. } => {
                    output::print_error(message);
                    std::process::exit(1);
                }
                other => {
                    tracing::error!("Run ended in unexpected state: {:?}", other);
                    output::print_error(video_summarizer::error::UNEXPECTED_ERROR_MESSAGE);
                    std::process::exit(1);
                }
            }
        }
        Commands::Interactive => {
            let pipeline = SummaryPipeline::from_config(&config)?;
            interactive(&pipeline, &config, cli.quiet).await?;
        }
        Commands::Config { show, init } => {
            if init {
                let path = config.save().await?;
                println!("Configuration written to: {}", path.display());
            } else if !show {
                println!("Configuration file: {}", Config::config_path()?.display());
            }
            config.display();
        }
        Commands::Sources => {
            println!("Accepted inputs:");
            println!("  • YouTube watch URLs (youtube.com/watch?v=...)");
            println!("  • YouTube short links (youtu.be/...)");
            println!("  • YouTube embed URLs (youtube.com/embed/...)");
            println!(
                "  • Local audio/video files: mp3, wav, mp4, webm (up to {})",
                utils::format_file_size(config.app.max_upload_bytes)
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "video_summarizer=debug"
    } else {
        "video_summarizer=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Translate typed input into a session event.
///
/// Existing paths are treated as dropped files and go through admission;
/// everything else is URL text. Rejected files produce no event.
async fn input_event(input: &str, upload_limit: u64) -> Result<Option<SessionEvent>> {
    let path = Path::new(input);
    if utils::looks_like_url(input) || !path.exists() {
        return Ok(Some(SessionEvent::InputChanged(input.to_string())));
    }

    let candidate = FileCandidate::from_path(path).await?;
    let size = candidate.size;
    match accept_file(candidate, upload_limit) {
        Ok(handle) => {
            tracing::info!(
                "Accepted {} ({}, {}), preview at {}",
                handle.name(),
                handle.format().as_str(),
                utils::format_file_size(size),
                handle.preview_url()
            );
            Ok(Some(SessionEvent::FileDropped(handle)))
        }
        Err(rejection) => {
            tracing::warn!("File not accepted: {}: {}", input, rejection);
            Ok(None)
        }
    }
}

/// Perform a pipeline effect with a spinner and feed the outcome back into the session
async fn drive(
    session: &mut Session,
    pipeline: &SummaryPipeline,
    effect: Effect,
    quiet: bool,
) -> (SourceInfo, Option<PipelineOutput>) {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.red} [{elapsed_precise}] {msg}") {
        progress.set_style(spinner);
    }
    progress.set_message("Processing...");
    progress.enable_steady_tick(Duration::from_millis(120));

    let outcome = effect.perform(pipeline).await;
    progress.finish_and_clear();

    session.dispatch(outcome.event);
    (outcome.source, outcome.output)
}

async fn interactive(pipeline: &SummaryPipeline, config: &Config, quiet: bool) -> Result<()> {
    println!("{}", style("Smart Video Summarizer").bold().red());
    println!("Enter a YouTube URL or a media file path, then `submit`. `reset` clears, `quit` exits.");

    let mut session = Session::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "reset" => {
                let had_input = session.state().can_reset();
                session.dispatch(SessionEvent::ResetRequested);
                if had_input {
                    println!("Form cleared.");
                } else {
                    println!("Nothing to clear.");
                }
            }
            "submit" => {
                if let Some(effect) = session.dispatch(SessionEvent::SubmitRequested) {
                    drive(&mut session, pipeline, effect, quiet).await;
                }
                render_request(&session.state().request);
            }
            text => match input_event(text, config.app.max_upload_bytes).await {
                Ok(Some(event)) => {
                    session.dispatch(event);
                    println!("Ready. Type `submit` to generate a summary.");
                }
                Ok(None) => println!(
                    "That file was not accepted (mp3, wav, mp4 or webm up to {}).",
                    utils::format_file_size(config.app.max_upload_bytes)
                ),
                Err(err) => {
                    tracing::debug!("{:#}", err);
                    let (_, message) = classify(&err);
                    output::print_error(&message);
                }
            },
        }
    }

    Ok(())
}

fn render_request(request: &RequestState) {
    match request {
        RequestState::Success(summary) => {
            println!("{}", style("AI Summary").bold().red());
            println!("{}", summary);
        }
        RequestState::Failed { message, .. } => output::print_error(message),
        RequestState::Idle | RequestState::Loading { .. } => {}
    }
}
