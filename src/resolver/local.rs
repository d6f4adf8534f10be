use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Upload cap enforced before a file is admitted (25 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Media formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaFormat {
    Mp3,
    Wav,
    Mp4,
    Webm,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Wav => "wav",
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Webm => "webm",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(MediaFormat::Mp3),
            "wav" => Some(MediaFormat::Wav),
            "mp4" => Some(MediaFormat::Mp4),
            "webm" => Some(MediaFormat::Webm),
            _ => None,
        }
    }

    /// Get MIME type for the format
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "audio/mpeg",
            MediaFormat::Wav => "audio/wav",
            MediaFormat::Mp4 => "video/mp4",
            MediaFormat::Webm => "video/webm",
        }
    }
}

/// Why a dropped file was not admitted
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

/// A file the user picked, before admission checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub path: PathBuf,
    pub mime_type: String,
    pub size: u64,
}

impl FileCandidate {
    /// Build a candidate from a path on disk, inferring the MIME type from the extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("File does not exist: {}", path.display());
        }

        if !path.is_file() {
            anyhow::bail!("Path is not a file: {}", path.display());
        }

        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("Cannot access file {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Local File")
            .to_string();

        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaFormat::from_extension)
            .map(|format| format.mime_type())
            .unwrap_or("application/octet-stream")
            .to_string();

        let absolute_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        Ok(Self {
            name,
            path: absolute_path,
            mime_type,
            size: metadata.len(),
        })
    }
}

/// An admitted file. Only [`accept_file`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    path: PathBuf,
    mime_type: String,
    size: u64,
    format: MediaFormat,
    preview_url: String,
}

impl FileHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn format(&self) -> MediaFormat {
        self.format
    }

    /// Local preview reference. Never sent to any service; dropped with the handle.
    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }
}

/// Admit a file if its MIME type is `audio/*` or `video/*`, its extension is
/// one of the accepted formats and it fits under `limit` bytes.
pub fn accept_file(candidate: FileCandidate, limit: u64) -> Result<FileHandle, FileRejection> {
    let mime = candidate.mime_type.to_lowercase();
    if !(mime.starts_with("audio/") || mime.starts_with("video/")) {
        return Err(FileRejection::UnsupportedType(candidate.mime_type));
    }

    let format = Path::new(&candidate.name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaFormat::from_extension)
        .ok_or_else(|| FileRejection::UnsupportedExtension(candidate.name.clone()))?;

    if candidate.size > limit {
        return Err(FileRejection::TooLarge {
            size: candidate.size,
            limit,
        });
    }

    let preview_url = format!("local-file://{}", candidate.path.display());

    Ok(FileHandle {
        name: candidate.name,
        path: candidate.path,
        mime_type: candidate.mime_type,
        size: candidate.size,
        format,
        preview_url,
    })
}

#[cfg(test)]
pub(crate) fn test_handle(name: &str) -> FileHandle {
    let format = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaFormat::from_extension)
        .unwrap_or(MediaFormat::Mp3);
    accept_file(
        FileCandidate {
            name: name.to_string(),
            path: PathBuf::from("/tmp").join(name),
            mime_type: format.mime_type().to_string(),
            size: 1024,
        },
        MAX_UPLOAD_BYTES,
    )
    .expect("test file is admissible")
}
