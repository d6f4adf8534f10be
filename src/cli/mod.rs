use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::locale::Locale;

#[derive(Parser)]
#[command(
    name = "summarizer",
    about = "Video Summarizer - Summarize YouTube videos and local media files",
    version,
    long_about = "Summarizes a YouTube video (from its metadata) or a local audio/video file (via speech-to-text) using hosted Hugging Face models."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", global = true, hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Hugging Face API token
    #[arg(long, env = "HUGGINGFACE_API_KEY", global = true, hide_env_values = true)]
    pub huggingface_api_key: Option<String>,

    /// Locale for numbers and dates in video transcripts (e.g. en-US, de-DE)
    #[arg(long, global = true, value_parser = parse_locale)]
    pub locale: Option<Locale>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a YouTube URL or a local media file
    Summarize {
        /// YouTube URL or path to an mp3/wav/mp4/webm file
        #[arg(value_name = "URL_OR_FILE")]
        input: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Include the transcript the summary was generated from
        #[arg(long)]
        show_transcript: bool,
    },

    /// Line-oriented form: enter a URL or file path, then `submit`, `reset` or `quit`
    Interactive,

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },

    /// List accepted inputs
    Sources,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON report
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        <OutputFormat as ValueEnum>::from_str(s, true).map_err(|e| anyhow::anyhow!(e))
    }
}

fn parse_locale(tag: &str) -> Result<Locale, String> {
    tag.parse::<Locale>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_summarize() {
        let cli = Cli::try_parse_from([
            "summarizer",
            "summarize",
            "https://youtu.be/abc",
            "--format",
            "json",
            "--locale",
            "de-DE",
        ])
        .unwrap();
        assert_eq!(cli.locale, Some(Locale::DeDe));
        match cli.command {
            Commands::Summarize { input, format, .. } => {
                assert_eq!(input, "https://youtu.be/abc");
                assert!(matches!(format, Some(OutputFormat::Json)));
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn test_rejects_unknown_locale() {
        assert!(Cli::try_parse_from(["summarizer", "--locale", "xx", "sources"]).is_err());
    }

    #[test]
    fn test_output_format_from_config_string() {
        assert!(matches!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
