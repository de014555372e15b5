//! Axum router configuration

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{
    health_check, list_videos, load_folder, media, next_video, playback_error, previous_video,
    select_video, track, version_check, video_ended,
};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        // Catalog and selection
        .route("/api/folder", post(load_folder))
        .route("/api/videos", get(list_videos))
        .route("/api/select/{index}", post(select_video))
        .route("/api/next", post(next_video))
        .route("/api/previous", post(previous_video))
        .route("/api/ended", post(video_ended))
        .route("/api/error", post(playback_error))
        // Media and subtitle tracks
        .route("/media/{session}/{index}", get(media))
        .route("/tracks/{session}/{load}/{track}", get(track))
        .layer(TraceLayer::new_for_http());

    let router = if state.config.cors_enabled {
        // The media element issues range requests from another origin
        // during local development.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::HEAD])
            .allow_headers([
                header::ACCEPT,
                header::RANGE,
                header::CONTENT_TYPE,
                header::ORIGIN,
            ])
            .max_age(Duration::from_secs(3600));
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
