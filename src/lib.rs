//! vidshelf core
//!
//! Classifies the files of a local folder, pairs subtitle files with videos
//! by name, converts SRT subtitles to WebVTT and drives an external playback
//! surface from catalog selections.

pub mod catalog;
pub mod error;
pub mod index;
pub mod playback;
pub mod subtitle;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use catalog::{Catalog, CatalogNotice, CatalogSummary, SelectedVideo};
pub use error::{ConversionError, OutOfRangeError, Result, ShelfError};
pub use index::{ExtensionPolicy, PolicyProfile};
pub use playback::{
    LoadReport, MediaHandle, PendingLoad, PlaybackCoordinator, PlaybackStatus, PlaybackSurface,
    ResolvedLoad,
};
pub use subtitle::{ConvertedTrack, TrackFailure, TrackSet};
pub use types::{format_file_size, Category, ContentSource, FileEntry, SubtitleFormat};
