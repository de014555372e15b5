//! Playback coordination
//!
//! The coordinator owns a [`Catalog`] and a [`PlaybackSurface`]. Selecting a
//! video happens in three steps so the subtitle read can run without holding
//! the coordinator:
//!
//! 1. `begin*` selects in the catalog and returns a [`PendingLoad`].
//! 2. [`PendingLoad::resolve`] reads and converts the matched subtitles.
//! 3. [`PlaybackCoordinator::complete`] hands the media to the surface,
//!    unless another selection happened in between, in which case the result
//!    is dropped.

use std::fmt;

use tokio::io::AsyncRead;

use crate::catalog::{Catalog, CatalogSummary, SelectedVideo};
use crate::error::OutOfRangeError;
use crate::index::resolve_mime;
use crate::subtitle::{ConvertedTrack, TrackFailure, TrackSet};
use crate::types::FileEntry;

/// Reason reported when the surface cannot play a file
pub const DEFAULT_PLAYBACK_ERROR: &str =
    "This video's format or codec is not supported by the browser. \
     Supported formats: MP4, WebM, OGG, MOV, M4V.";

/// The video handed to the playback surface
#[derive(Debug, Clone)]
pub struct MediaHandle {
    pub entry: FileEntry,
    pub mime_type: String,
}

impl MediaHandle {
    pub fn from_entry(entry: FileEntry) -> Self {
        let mime_type = resolve_mime(&entry);
        Self { entry, mime_type }
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Open the video bytes as a stream
    pub async fn open(&self) -> std::io::Result<Box<dyn AsyncRead + Send + Unpin>> {
        self.entry.content.open().await
    }
}

/// The external media element
pub trait PlaybackSurface {
    /// Replace whatever is playing with `media` and attach `tracks`
    fn load(&mut self, media: MediaHandle, tracks: Vec<ConvertedTrack>);
}

/// Per-selection status for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Loaded with this many subtitle tracks attached
    Loaded { tracks: usize },
    /// Loaded, no external subtitle could be attached
    NoSubtitles,
    /// Loaded, and the container may carry subtitles we cannot extract
    EmbeddedSubtitlesOnly,
    /// The surface failed to play the file
    Errored { reason: String },
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Loaded { tracks } => write!(f, "Playing with {} subtitle track(s)", tracks),
            PlaybackStatus::NoSubtitles => write!(f, "Playing without subtitles"),
            PlaybackStatus::EmbeddedSubtitlesOnly => write!(
                f,
                "Playing; this file may contain embedded subtitles that cannot be shown"
            ),
            PlaybackStatus::Errored { reason } => write!(f, "Playback failed: {}", reason),
        }
    }
}

/// What a completed load did
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub index: usize,
    pub media: MediaHandle,
    pub status: PlaybackStatus,
    pub failures: Vec<TrackFailure>,
}

/// A selection whose subtitles have not been read yet
#[derive(Debug, Clone)]
pub struct PendingLoad {
    ticket: u64,
    selection: SelectedVideo,
}

impl PendingLoad {
    pub fn index(&self) -> usize {
        self.selection.index
    }

    pub fn selection(&self) -> &SelectedVideo {
        &self.selection
    }

    /// Read and convert the matched subtitles
    pub async fn resolve(self) -> ResolvedLoad {
        let tracks = self.selection.convert_tracks().await;
        ResolvedLoad {
            ticket: self.ticket,
            selection: self.selection,
            tracks,
        }
    }
}

/// A selection with its converted tracks, ready for [`PlaybackCoordinator::complete`]
#[derive(Debug, Clone)]
pub struct ResolvedLoad {
    ticket: u64,
    selection: SelectedVideo,
    tracks: TrackSet,
}

impl ResolvedLoad {
    pub fn index(&self) -> usize {
        self.selection.index
    }

    pub fn tracks(&self) -> &TrackSet {
        &self.tracks
    }
}

/// Drives a playback surface from catalog selections
#[derive(Debug)]
pub struct PlaybackCoordinator<S> {
    catalog: Catalog,
    surface: S,
    ticket: u64,
    status: Option<PlaybackStatus>,
}

impl<S: PlaybackSurface> PlaybackCoordinator<S> {
    pub fn new(catalog: Catalog, surface: S) -> Self {
        Self {
            catalog,
            surface,
            ticket: 0,
            status: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Status of the current selection, if any
    pub fn status(&self) -> Option<&PlaybackStatus> {
        self.status.as_ref()
    }

    /// Replace the catalog contents; pending loads become stale
    pub fn load_files<I>(&mut self, files: I) -> CatalogSummary
    where
        I: IntoIterator<Item = FileEntry>,
    {
        self.ticket += 1;
        self.status = None;
        self.catalog.load(files)
    }

    fn pending(&mut self, selection: SelectedVideo) -> PendingLoad {
        self.ticket += 1;
        self.status = None;
        PendingLoad {
            ticket: self.ticket,
            selection,
        }
    }

    /// Select `index` and start a load
    pub fn begin(&mut self, index: usize) -> Result<PendingLoad, OutOfRangeError> {
        let selection = self.catalog.select(index)?;
        Ok(self.pending(selection))
    }

    /// Select a signed index as received from user input
    pub fn begin_signed(&mut self, index: i64) -> Result<PendingLoad, OutOfRangeError> {
        let selection = self.catalog.select_signed(index)?;
        Ok(self.pending(selection))
    }

    /// Start loading the next video; `None` at the end of the list
    pub fn begin_next(&mut self) -> Option<PendingLoad> {
        let selection = self.catalog.select_next()?;
        Some(self.pending(selection))
    }

    /// Start loading the previous video; `None` at the start of the list
    pub fn begin_previous(&mut self) -> Option<PendingLoad> {
        let selection = self.catalog.select_previous()?;
        Some(self.pending(selection))
    }

    /// The current video finished: advance to the next one, if any
    pub fn on_ended(&mut self) -> Option<PendingLoad> {
        let pending = self.begin_next();
        if pending.is_none() {
            tracing::debug!("Playback ended on the last video");
        }
        pending
    }

    /// Hand a resolved load to the surface.
    ///
    /// Returns `None` and drops the result if a newer selection or load
    /// happened since the load began.
    pub fn complete(&mut self, resolved: ResolvedLoad) -> Option<LoadReport> {
        if resolved.ticket != self.ticket {
            tracing::debug!(
                "Discarding stale load of {:?} (ticket {} != {})",
                resolved.selection.video.name,
                resolved.ticket,
                self.ticket
            );
            return None;
        }

        let ResolvedLoad {
            selection, tracks, ..
        } = resolved;
        let TrackSet { tracks, failures } = tracks;

        let status = if !tracks.is_empty() {
            PlaybackStatus::Loaded {
                tracks: tracks.len(),
            }
        } else if self.catalog.policy().may_embed_subtitles(&selection.video.name) {
            PlaybackStatus::EmbeddedSubtitlesOnly
        } else {
            PlaybackStatus::NoSubtitles
        };

        let media = MediaHandle::from_entry(selection.video);
        tracing::info!(
            "Loading {:?} as {} ({})",
            media.name(),
            media.mime_type,
            status
        );
        self.surface.load(media.clone(), tracks);
        self.status = Some(status.clone());

        Some(LoadReport {
            index: selection.index,
            media,
            status,
            failures,
        })
    }

    /// The surface could not play the current video
    pub fn on_playback_error(&mut self, reason: Option<String>) -> Option<PlaybackStatus> {
        let video = self.catalog.selected_video()?;
        let reason = reason.unwrap_or_else(|| DEFAULT_PLAYBACK_ERROR.to_string());
        tracing::warn!("Playback of {:?} failed: {}", video.name, reason);

        let status = PlaybackStatus::Errored { reason };
        self.status = Some(status.clone());
        Some(status)
    }

    /// Select, convert and load in one go
    pub async fn play(&mut self, index: usize) -> Result<Option<LoadReport>, OutOfRangeError> {
        let pending = self.begin(index)?;
        let resolved = pending.resolve().await;
        Ok(self.complete(resolved))
    }

    /// Load the next video; `None` at the end of the list
    pub async fn play_next(&mut self) -> Option<LoadReport> {
        let resolved = self.begin_next()?.resolve().await;
        self.complete(resolved)
    }

    /// Load the previous video; `None` at the start of the list
    pub async fn play_previous(&mut self) -> Option<LoadReport> {
        let resolved = self.begin_previous()?.resolve().await;
        self.complete(resolved)
    }
}
