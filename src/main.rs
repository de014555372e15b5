//! vidshelf server
//!
//! Serves the videos of a local folder to a browser, pairing each video with
//! its subtitle files and converting SRT subtitles to WebVTT on selection.

mod config;
mod config_file;
mod http;
mod server_error;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::http::create_router;
use crate::server_error::{Result, ServerError};
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "vidshelf";

/// Config file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "vidshelf.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    // vidshelf --generate-config [path]
    if first.as_deref() == Some("--generate-config") {
        let path = args
            .next()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        crate::config_file::generate_default_config(&path).map_err(|e| {
            ServerError::Shelf(vidshelf::ShelfError::Config(format!(
                "cannot write {}: {}",
                path, e
            )))
        })?;
        println!("Wrote default configuration to {}", path);
        return Ok(());
    }

    let config_path = first.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let (config, config_warning) = load_config(&config_path);

    // Initialize logging
    init_logging(&config);
    if let Some(warning) = config_warning {
        tracing::warn!("{}", warning);
    }

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    tracing::info!("Configuration loaded: {:?}", config);

    // Create application state
    let state = Arc::new(AppState::new(config.clone()));

    if let Some(root) = &config.library.root {
        match state.load_folder(root, config.library.recursive).await {
            Ok(summary) => {
                tracing::info!(
                    "Library {:?}: {} videos, {} subtitles, {} unsupported",
                    root,
                    summary.video_count,
                    summary.subtitle_count,
                    summary.unsupported_count
                );
                if let Some(notice) = summary.notice() {
                    tracing::warn!("{}", notice);
                }
            }
            Err(e) => tracing::warn!("Failed to load library {:?}: {}", root, e),
        }
    }

    // Build router
    let app = create_router(state.clone());

    // Start server
    let addr: SocketAddr =
        config
            .socket_addr()
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
                addr: config.socket_addr(),
                reason: e.to_string(),
            })?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the config file, falling back to defaults.
///
/// Runs before logging is set up, so a problem is returned for the caller to
/// log.
fn load_config(path: &str) -> (ServerConfig, Option<String>) {
    if !std::path::Path::new(path).exists() {
        return (ServerConfig::default(), None);
    }
    match crate::config_file::ConfigFile::from_file(path) {
        Ok(cf) => (cf.into_server_config(), None),
        Err(e) => (
            ServerConfig::default(),
            Some(format!(
                "Failed to load config file {}: {}. Using defaults.",
                path, e
            )),
        ),
    }
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_directive().into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
