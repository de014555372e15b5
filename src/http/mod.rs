//! HTTP server module
//!
//! Serves the catalog to a browser front-end:
//! - Folder loading and the video list
//! - Selection, next/previous and auto-advance
//! - Video bytes with range support
//! - Converted WebVTT tracks
//! - CORS middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;
