use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::resolver::SourceInfo;

/// Everything shown to the user after a successful run
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub source: SourceInfo,
    pub summary: String,

    /// Included only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    pub generated_at: DateTime<Utc>,
}

pub fn format_as_text(report: &SummaryReport) -> String {
    match &report.transcript {
        Some(transcript) => format!(
            "Summary\n=======\n{}\n\nTranscript\n==========\n{}\n",
            report.summary, transcript
        ),
        None => format!("{}\n", report.summary),
    }
}

pub fn format_as_json(report: &SummaryReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize summary report")
}

fn render(report: &SummaryReport, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_as_text(report)),
        OutputFormat::Json => format_as_json(report),
    }
}

/// Save summary report to file
pub async fn save_to_file(report: &SummaryReport, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(report, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print summary report to console
pub fn print_to_console(report: &SummaryReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", style("AI Summary").bold().red());
            print!("{}", format_as_text(report));
        }
        OutputFormat::Json => println!("{}", format_as_json(report)?),
    }
    Ok(())
}

/// Print a failure message to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("error:").bold().red(), message);
}
