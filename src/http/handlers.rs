//! HTTP request handlers

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use vidshelf::index::resolve_mime;
use vidshelf::{
    format_file_size, Catalog, ContentSource, LoadReport, MediaHandle, OutOfRangeError,
    PendingLoad, ResolvedLoad, ShelfError,
};

use crate::state::{AppState, LoadedMedia};

/// Error type for HTTP handlers
#[derive(Debug)]
pub enum HttpError {
    NotFound(String),
    BadRequest(String),
    /// Another selection happened while this one was loading
    Superseded,
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Superseded => (
                StatusCode::CONFLICT,
                "Selection superseded by a newer request".to_string(),
            ),
            HttpError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, body).into_response()
    }
}

impl From<ShelfError> for HttpError {
    fn from(err: ShelfError) -> Self {
        match err {
            ShelfError::OutOfRange(_)
            | ShelfError::SessionNotFound(_)
            | ShelfError::TrackNotFound(_) => HttpError::NotFound(err.to_string()),
            ShelfError::NotAFolder(_) => HttpError::BadRequest(err.to_string()),
            _ => HttpError::InternalError(err.to_string()),
        }
    }
}

impl From<OutOfRangeError> for HttpError {
    fn from(err: OutOfRangeError) -> Self {
        HttpError::NotFound(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct VideoView {
    pub index: usize,
    pub name: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub mime_type: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub session_id: String,
    pub videos: Vec<VideoView>,
    pub subtitle_count: usize,
    pub unsupported_count: usize,
    pub notice: Option<String>,
    pub selected: Option<usize>,
}

impl CatalogView {
    fn new(catalog: &Catalog) -> Self {
        let summary = catalog.summary();
        let videos = catalog
            .videos()
            .iter()
            .enumerate()
            .map(|(index, video)| VideoView {
                index,
                name: video.name.clone(),
                size_bytes: video.size_bytes,
                size_label: format_file_size(video.size_bytes),
                mime_type: resolve_mime(video),
                url: media_url(&summary.session_id, index),
            })
            .collect();

        Self {
            videos,
            subtitle_count: summary.subtitle_count,
            unsupported_count: summary.unsupported_count,
            notice: summary.notice().map(|notice| notice.to_string()),
            selected: catalog.selected_index(),
            session_id: summary.session_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackView {
    pub label: String,
    pub language: Option<String>,
    pub default: bool,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FailureView {
    pub subtitle: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct LoadView {
    pub index: usize,
    pub name: String,
    pub media_url: String,
    pub mime_type: String,
    pub tracks: Vec<TrackView>,
    pub status: String,
    pub failures: Vec<FailureView>,
}

impl LoadView {
    fn new(report: &LoadReport, loaded: &LoadedMedia) -> Self {
        let tracks = loaded
            .tracks
            .iter()
            .enumerate()
            .map(|(i, track)| TrackView {
                label: track.label.clone(),
                language: track.language.clone(),
                default: track.is_default,
                url: format!("/tracks/{}/{}/{}", loaded.session_id, loaded.load_id, i),
            })
            .collect();

        Self {
            index: report.index,
            name: report.media.name().to_string(),
            media_url: media_url(&loaded.session_id, report.index),
            mime_type: report.media.mime_type.clone(),
            tracks,
            status: report.status.to_string(),
            failures: report
                .failures
                .iter()
                .map(|failure| FailureView {
                    subtitle: failure.subtitle.clone(),
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

fn media_url(session_id: &str, index: usize) -> String {
    format!("/media/{}/{}", session_id, index)
}

#[derive(Debug, Deserialize)]
pub struct FolderRequest {
    pub path: PathBuf,
    pub recursive: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackErrorRequest {
    pub reason: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("vidshelf v", env!("CARGO_PKG_VERSION"))
}

/// Scan a folder and replace the catalog
pub async fn load_folder(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FolderRequest>,
) -> Result<Json<CatalogView>, HttpError> {
    let recursive = request
        .recursive
        .unwrap_or(state.config.library.recursive);
    let summary = state.load_folder(&request.path, recursive).await?;
    tracing::info!(
        "Loaded {:?}: {} videos, {} subtitles",
        request.path,
        summary.video_count,
        summary.subtitle_count
    );

    let coordinator = state.coordinator.lock().await;
    Ok(Json(CatalogView::new(coordinator.catalog())))
}

/// Current catalog
pub async fn list_videos(State(state): State<Arc<AppState>>) -> Json<CatalogView> {
    let coordinator = state.coordinator.lock().await;
    Json(CatalogView::new(coordinator.catalog()))
}

/// Select a video by index
pub async fn select_video(
    State(state): State<Arc<AppState>>,
    Path(index): Path<i64>,
) -> Result<Response, HttpError> {
    let pending = state.coordinator.lock().await.begin_signed(index)?;
    finish_load(&state, pending).await
}

/// Select the next video
pub async fn next_video(State(state): State<Arc<AppState>>) -> Result<Response, HttpError> {
    let pending = state.coordinator.lock().await.begin_next();
    finish_optional(&state, pending).await
}

/// Select the previous video
pub async fn previous_video(State(state): State<Arc<AppState>>) -> Result<Response, HttpError> {
    let pending = state.coordinator.lock().await.begin_previous();
    finish_optional(&state, pending).await
}

/// The browser finished the current video
pub async fn video_ended(State(state): State<Arc<AppState>>) -> Result<Response, HttpError> {
    let pending = state.coordinator.lock().await.on_ended();
    finish_optional(&state, pending).await
}

/// The browser failed to play the current video
pub async fn playback_error(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlaybackErrorRequest>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let status = state
        .coordinator
        .lock()
        .await
        .on_playback_error(request.reason)
        .ok_or_else(|| HttpError::NotFound("No video selected".to_string()))?;

    Ok(Json(serde_json::json!({ "status": status.to_string() })))
}

async fn finish_optional(
    state: &AppState,
    pending: Option<PendingLoad>,
) -> Result<Response, HttpError> {
    match pending {
        Some(pending) => finish_load(state, pending).await,
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Read subtitles without the coordinator lock, then complete the load
async fn finish_load(state: &AppState, pending: PendingLoad) -> Result<Response, HttpError> {
    let resolved = pending.resolve().await;
    let view = complete_load(state, resolved).await?;
    Ok(Json(view).into_response())
}

/// Complete a load and describe it from what the surface holds, both under
/// one coordinator lock
async fn complete_load(state: &AppState, resolved: ResolvedLoad) -> Result<LoadView, HttpError> {
    let mut coordinator = state.coordinator.lock().await;
    let report = coordinator
        .complete(resolved)
        .ok_or(HttpError::Superseded)?;
    let loaded = coordinator
        .surface()
        .loaded()
        .ok_or_else(|| HttpError::InternalError("Load was not published".to_string()))?;
    Ok(LoadView::new(&report, &loaded))
}

/// Video bytes; file-backed media supports range requests
pub async fn media(
    State(state): State<Arc<AppState>>,
    Path((session_id, index)): Path<(String, usize)>,
    request: Request,
) -> Result<Response, HttpError> {
    let media = {
        let coordinator = state.coordinator.lock().await;
        let catalog = coordinator.catalog();
        if catalog.session_id() != session_id {
            return Err(ShelfError::SessionNotFound(session_id).into());
        }
        let entry = catalog
            .videos()
            .get(index)
            .cloned()
            .ok_or_else(|| OutOfRangeError::new(index, catalog.video_count()))?;
        MediaHandle::from_entry(entry)
    };

    let content_type = HeaderValue::from_str(&media.mime_type)
        .map_err(|e| HttpError::InternalError(e.to_string()))?;

    match &media.entry.content {
        ContentSource::File(path) => {
            let mut response = ServeFile::new(path)
                .oneshot(request)
                .await
                .unwrap_or_else(|never| match never {});
            // ServeFile guesses from the extension; the policy's type wins
            if response.status().is_success() {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type);
            }
            Ok(response.map(Body::new))
        }
        ContentSource::Memory(data) => {
            Ok(([(header::CONTENT_TYPE, content_type)], data.clone()).into_response())
        }
    }
}

/// WebVTT text of a track attached to the current load
pub async fn track(
    State(state): State<Arc<AppState>>,
    Path((session_id, load_id, track_index)): Path<(String, u64, usize)>,
) -> Result<Response, HttpError> {
    let text = {
        let loaded = state.loaded.read();
        let loaded = loaded
            .as_ref()
            .filter(|loaded| loaded.session_id == session_id)
            .ok_or_else(|| ShelfError::SessionNotFound(session_id.clone()))?;
        let track_id = format!("{}/{}/{}", session_id, load_id, track_index);
        if loaded.load_id != load_id {
            return Err(ShelfError::TrackNotFound(track_id).into());
        }
        loaded
            .tracks
            .get(track_index)
            .map(|track| track.text.clone())
            .ok_or(ShelfError::TrackNotFound(track_id))?
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/vtt; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        text,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHi\n";

    async fn state_with_library(dir: &tempfile::TempDir) -> Arc<AppState> {
        std::fs::write(dir.path().join("a.mp4"), b"a").unwrap();
        std::fs::write(dir.path().join("a.srt"), SRT).unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"b").unwrap();

        let state = Arc::new(AppState::new(ServerConfig::default()));
        state.load_folder(dir.path(), true).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_back_to_back_loads_keep_their_own_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_library(&dir).await;

        let first = state.coordinator.lock().await.begin(0).unwrap();
        let first = complete_load(&state, first.resolve().await).await.unwrap();
        let second = state.coordinator.lock().await.begin(1).unwrap();
        let second = complete_load(&state, second.resolve().await).await.unwrap();

        assert_eq!(first.name, "a.mp4");
        assert_eq!(first.tracks.len(), 1);
        assert_eq!(second.name, "b.mp4");
        assert!(second.tracks.is_empty());

        // the first load's track URL no longer resolves to anything
        let loaded = state.loaded.read().clone().unwrap();
        assert_eq!(loaded.media.name(), "b.mp4");
        assert_ne!(
            first.tracks[0].url,
            format!("/tracks/{}/{}/0", loaded.session_id, loaded.load_id)
        );
    }

    #[tokio::test]
    async fn test_superseded_load_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_library(&dir).await;

        let first = state.coordinator.lock().await.begin(0).unwrap();
        let second = state.coordinator.lock().await.begin(1).unwrap();
        let first = first.resolve().await;

        assert!(matches!(
            complete_load(&state, first).await,
            Err(HttpError::Superseded)
        ));
        let second = complete_load(&state, second.resolve().await).await.unwrap();
        assert_eq!(second.name, "b.mp4");
    }
}
