use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

/// Where the bytes of a discovered file live
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// A file on the local file system
    File(PathBuf),
    /// An in-memory buffer (drag-drop uploads, tests)
    Memory(Bytes),
}

impl ContentSource {
    /// Read the whole content into memory
    pub async fn read_all(&self) -> std::io::Result<Bytes> {
        match self {
            ContentSource::File(path) => tokio::fs::read(path).await.map(Bytes::from),
            ContentSource::Memory(data) => Ok(data.clone()),
        }
    }

    /// Open the content as an async byte stream
    pub async fn open(&self) -> std::io::Result<Box<dyn AsyncRead + Send + Unpin>> {
        match self {
            ContentSource::File(path) => Ok(Box::new(tokio::fs::File::open(path).await?)),
            ContentSource::Memory(data) => Ok(Box::new(std::io::Cursor::new(data.clone()))),
        }
    }

    /// Backing path, for file-backed content
    pub fn path(&self) -> Option<&Path> {
        match self {
            ContentSource::File(path) => Some(path),
            ContentSource::Memory(_) => None,
        }
    }
}

/// A file discovered in the selected folder. Immutable once created.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name without directories
    pub name: String,
    pub size_bytes: u64,
    /// MIME type reported by the source; empty when unknown
    pub mime_hint: String,
    pub content: ContentSource,
}

impl FileEntry {
    /// Create an entry for a file on disk, reading its size from metadata
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime_hint: String::new(),
            content: ContentSource::File(path.to_path_buf()),
        })
    }

    /// Create an entry backed by an in-memory buffer
    pub fn in_memory(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            mime_hint: String::new(),
            content: ContentSource::Memory(data),
        }
    }

    pub fn with_mime_hint(mut self, mime: impl Into<String>) -> Self {
        self.mime_hint = mime.into();
        self
    }

    /// Name without the final extension
    pub fn base_name(&self) -> &str {
        split_extension(&self.name).0
    }

    /// Lowercased final extension, if the name has one
    pub fn extension(&self) -> Option<String> {
        split_extension(&self.name)
            .1
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Split a file name at its last `.` into base name and extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], Some(&name[pos + 1..])),
        None => (name, None),
    }
}

/// File category derived from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Video,
    Subtitle,
    /// A video container the browser cannot play; counted, never selected
    UnsupportedVideo,
    Ignored,
}

/// Subtitle format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    SubRip,
    WebVtt,
    Ass,
    Ssa,
    Unknown,
}

impl SubtitleFormat {
    /// Map a lowercased extension to a subtitle format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "srt" => Some(SubtitleFormat::SubRip),
            "vtt" => Some(SubtitleFormat::WebVtt),
            "ass" => Some(SubtitleFormat::Ass),
            "ssa" => Some(SubtitleFormat::Ssa),
            _ => None,
        }
    }

    /// Detect the format of a subtitle file from its name
    pub fn from_name(name: &str) -> Option<Self> {
        split_extension(name)
            .1
            .and_then(|ext| Self::from_extension(&ext.to_ascii_lowercase()))
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtitleFormat::SubRip => write!(f, "SubRip (SRT)"),
            SubtitleFormat::WebVtt => write!(f, "WebVTT"),
            SubtitleFormat::Ass => write!(f, "ASS"),
            SubtitleFormat::Ssa => write!(f, "SSA"),
            SubtitleFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Human-readable size: `0 Bytes`, `1.5 KB`, `117.74 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
