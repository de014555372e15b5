//! Application state management
//!
//! The coordinator sits behind an async mutex that handlers hold only while
//! selecting or completing a load, never while subtitles are read. The
//! current load is mirrored into an `RwLock` so track requests do not wait
//! on the coordinator.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use vidshelf::index::{scan_folder_with_options, ScanOptions};
use vidshelf::{Catalog, CatalogSummary, ConvertedTrack, MediaHandle, PlaybackCoordinator, PlaybackSurface};

use crate::config::ServerConfig;

/// What the browser was last told to play
#[derive(Debug, Clone)]
pub struct LoadedMedia {
    /// Catalog session the load belongs to
    pub session_id: String,
    /// Increments with every load so track URLs of an earlier load fail
    pub load_id: u64,
    pub media: MediaHandle,
    pub tracks: Vec<ConvertedTrack>,
}

/// Playback surface backed by HTTP: a load is published for the media and
/// track endpoints to serve.
#[derive(Debug, Default)]
pub struct HttpSurface {
    session_id: String,
    loads: u64,
    current: Arc<RwLock<Option<LoadedMedia>>>,
}

impl HttpSurface {
    /// Switch to a new catalog session and drop the current load
    pub fn reset(&mut self, session_id: &str) {
        self.session_id = session_id.to_string();
        *self.current.write() = None;
    }

    /// Shared handle to the current load
    pub fn current(&self) -> Arc<RwLock<Option<LoadedMedia>>> {
        self.current.clone()
    }

    /// Copy of the current load
    pub fn loaded(&self) -> Option<LoadedMedia> {
        self.current.read().clone()
    }
}

impl PlaybackSurface for HttpSurface {
    fn load(&mut self, media: MediaHandle, tracks: Vec<ConvertedTrack>) {
        self.loads += 1;
        *self.current.write() = Some(LoadedMedia {
            session_id: self.session_id.clone(),
            load_id: self.loads,
            media,
            tracks,
        });
    }
}

/// Shared state for all handlers
pub struct AppState {
    /// Catalog and selection
    pub coordinator: Mutex<PlaybackCoordinator<HttpSurface>>,

    /// Current load, readable without the coordinator
    pub loaded: Arc<RwLock<Option<LoadedMedia>>>,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState with an empty catalog
    pub fn new(config: ServerConfig) -> Self {
        let catalog = Catalog::new(config.policy.build());
        let mut surface = HttpSurface::default();
        surface.reset(catalog.session_id());
        let loaded = surface.current();

        Self {
            coordinator: Mutex::new(PlaybackCoordinator::new(catalog, surface)),
            loaded,
            config,
        }
    }

    /// Create AppState with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// Scan `path` and replace the catalog contents
    pub async fn load_folder(
        &self,
        path: &Path,
        recursive: bool,
    ) -> vidshelf::Result<CatalogSummary> {
        let options = ScanOptions {
            recursive,
            ..Default::default()
        };
        let root = path.to_path_buf();
        let files = tokio::task::spawn_blocking(move || scan_folder_with_options(&root, &options))
            .await
            .map_err(std::io::Error::other)??;

        let mut coordinator = self.coordinator.lock().await;
        let summary = coordinator.load_files(files);
        coordinator.surface_mut().reset(&summary.session_id);
        Ok(summary)
    }
}
