use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::cli::OutputFormat;
use crate::locale::Locale;
use crate::resolver::MAX_UPLOAD_BYTES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YoutubeConfig,

    /// Hugging Face inference settings
    pub huggingface: HuggingFaceConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Base URL of the YouTube Data API
    pub api_base: String,

    /// API key, usually supplied through `YOUTUBE_API_KEY`
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    /// Base URL of the inference API
    pub api_base: String,

    /// API token, usually supplied through `HUGGINGFACE_API_KEY`
    pub api_key: Option<String>,

    /// Model used for summarization
    pub summarization_model: String,

    /// Model used for speech-to-text
    pub transcription_model: String,

    /// Generation parameters sent with every summarization request
    pub summary: SummaryParameters,
}

/// Generation parameters for the summarization model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryParameters {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
    pub temperature: f64,
    pub num_beams: u32,
    pub no_repeat_ngram_size: u32,
    pub length_penalty: f64,
}

impl Default for SummaryParameters {
    fn default() -> Self {
        Self {
            max_length: 300,
            min_length: 100,
            do_sample: true,
            temperature: 0.8,
            num_beams: 5,
            no_repeat_ngram_size: 3,
            length_penalty: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Locale for numbers and dates in YouTube transcripts
    pub locale: Locale,

    /// Largest file admitted for upload
    pub max_upload_bytes: u64,

    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YoutubeConfig {
                api_base: "https://www.googleapis.com/youtube/v3".to_string(),
                api_key: None,
            },
            huggingface: HuggingFaceConfig {
                api_base: "https://api-inference.huggingface.co".to_string(),
                api_key: None,
                summarization_model: "facebook/bart-large-cnn".to_string(),
                transcription_model: "openai/whisper-large-v3".to_string(),
                summary: SummaryParameters::default(),
            },
            app: AppConfig {
                locale: Locale::EnUs,
                max_upload_bytes: MAX_UPLOAD_BYTES,
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config = Self::from_yaml(&content)?;
            tracing::debug!("Loaded configuration from {}", config_path.display());
            Ok(config)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // Current directory wins so a project-local file can override
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("video-summarizer").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.youtube.api_base)
            .with_context(|| format!("Invalid YouTube API base URL: {}", self.youtube.api_base))?;
        Url::parse(&self.huggingface.api_base).with_context(|| {
            format!("Invalid Hugging Face API base URL: {}", self.huggingface.api_base)
        })?;

        let summary = &self.huggingface.summary;
        if summary.min_length > summary.max_length {
            anyhow::bail!(
                "Summary min_length ({}) must not exceed max_length ({})",
                summary.min_length,
                summary.max_length
            );
        }
        if summary.temperature <= 0.0 {
            anyhow::bail!("Summary temperature must be positive");
        }
        if summary.num_beams == 0 {
            anyhow::bail!("Summary num_beams must be at least 1");
        }
        if self.app.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be positive");
        }
        if self.app.max_upload_bytes > MAX_UPLOAD_BYTES {
            anyhow::bail!(
                "max_upload_bytes ({}) must not exceed {}",
                self.app.max_upload_bytes,
                MAX_UPLOAD_BYTES
            );
        }
        self.output_format()?;

        Ok(())
    }

    /// Default output format as configured
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.app
            .default_output_format
            .parse()
            .with_context(|| format!("Invalid output format: {}", self.app.default_output_format))
    }

    /// Override API keys and locale with values from the command line or environment
    pub fn apply_overrides(
        &mut self,
        youtube_api_key: Option<String>,
        huggingface_api_key: Option<String>,
        locale: Option<Locale>,
    ) {
        if let Some(key) = youtube_api_key.filter(|k| !k.is_empty()) {
            self.youtube.api_key = Some(key);
        }
        if let Some(key) = huggingface_api_key.filter(|k| !k.is_empty()) {
            self.huggingface.api_key = Some(key);
        }
        if let Some(locale) = locale {
            self.app.locale = locale;
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  YouTube API: {}", self.youtube.api_base);
        println!("  YouTube API Key: {}", mask(self.youtube.api_key.as_deref()));
        println!("  Hugging Face API: {}", self.huggingface.api_base);
        println!("  Hugging Face API Key: {}", mask(self.huggingface.api_key.as_deref()));
        println!("  Summarization Model: {}", self.huggingface.summarization_model);
        println!("  Transcription Model: {}", self.huggingface.transcription_model);
        println!("  Locale: {}", self.app.locale);
        println!("  Default Format: {}", self.app.default_output_format);
    }
}

fn mask(key: Option<&str>) -> &'static str {
    match key {
        Some(k) if !k.is_empty() => "(set)",
        _ => "(not set)",
    }
}
