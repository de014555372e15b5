use std::path::PathBuf;

use thiserror::Error;

use crate::types::SubtitleFormat;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum ShelfError {
    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A selection index outside the video list
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    /// A subtitle could not be converted
    #[error("Subtitle conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// The folder to scan does not exist or is not a directory
    #[error("Not a folder: {0}")]
    NotAFolder(PathBuf),

    /// A media or track URL refers to a catalog that is no longer loaded
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The requested subtitle track is not attached to the current selection
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A selection index outside `[0, len)`.
///
/// The index is signed so callers that receive user input (e.g. `-1`) can
/// report it unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Selection index {index} out of range (0..{len})")]
pub struct OutOfRangeError {
    pub index: i64,
    pub len: usize,
}

impl OutOfRangeError {
    /// Build an error for an unsigned index
    pub fn new(index: usize, len: usize) -> Self {
        Self {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }
    }
}

/// Per-subtitle conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The subtitle format has no conversion to WebVTT
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(SubtitleFormat),

    /// The subtitle bytes could not be read or decoded as text
    #[error("Failed to read subtitle: {0}")]
    ReadError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ShelfError>;
