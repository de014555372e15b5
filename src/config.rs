//! Server configuration

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vidshelf::{Category, ExtensionPolicy, PolicyProfile};

/// Folder to load at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Folder scanned at startup; none means wait for `POST /api/folder`
    pub root: Option<PathBuf>,

    /// Descend into subfolders
    pub recursive: bool,
}

/// Extension policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Starting table
    pub profile: PolicyProfile,

    /// Per-extension categories applied on top of the profile
    pub overrides: BTreeMap<String, Category>,

    /// Containers that may carry embedded subtitles
    pub embedded_subtitle_containers: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            profile: PolicyProfile::Paired,
            overrides: BTreeMap::new(),
            embedded_subtitle_containers: vec!["mkv".to_string()],
        }
    }
}

impl PolicyConfig {
    /// Build the extension policy
    pub fn build(&self) -> ExtensionPolicy {
        let policy = ExtensionPolicy::from_profile(self.profile)
            .with_embedded_subtitle_containers(&self.embedded_subtitle_containers);
        self.overrides
            .iter()
            .fold(policy, |policy, (ext, category)| {
                policy.with_override(ext, *category)
            })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Library configuration
    pub library: LibraryConfig,

    /// Extension policy
    pub policy: PolicyConfig,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            library: LibraryConfig {
                root: None,
                recursive: true,
            },
            policy: PolicyConfig::default(),
            cors_enabled: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing directive for this configuration
    pub fn log_directive(&self) -> String {
        format!("vidshelf={level},tower_http={level}", level = self.log_level)
    }
}
