//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use vidshelf::{Category, PolicyProfile};

use crate::config::{LibraryConfig, PolicyConfig, ServerConfig};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Library settings
    pub library: Option<LibrarySettings>,
    /// Extension policy settings
    pub policy: Option<PolicySettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySettings {
    /// Folder to load at startup
    pub root: Option<PathBuf>,
    /// Descend into subfolders
    pub recursive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySettings {
    /// strict, flagged or paired
    pub profile: Option<PolicyProfile>,
    /// Containers that may carry embedded subtitles
    pub embedded_subtitle_containers: Option<Vec<String>>,
    /// Extension -> category
    #[serde(default)]
    pub overrides: BTreeMap<String, Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerSettings {
                host: defaults.host,
                port: defaults.port,
                cors_enabled: Some(defaults.cors_enabled),
            },
            library: Some(LibrarySettings {
                root: None,
                recursive: Some(defaults.library.recursive),
            }),
            policy: Some(PolicySettings {
                profile: Some(defaults.policy.profile),
                embedded_subtitle_containers: Some(
                    defaults.policy.embedded_subtitle_containers,
                ),
                overrides: BTreeMap::new(),
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();

        let library = match self.library {
            Some(library) => LibraryConfig {
                root: library.root,
                recursive: library.recursive.unwrap_or(defaults.library.recursive),
            },
            None => defaults.library,
        };

        let policy = match self.policy {
            Some(policy) => PolicyConfig {
                profile: policy.profile.unwrap_or(defaults.policy.profile),
                overrides: policy.overrides,
                embedded_subtitle_containers: policy
                    .embedded_subtitle_containers
                    .unwrap_or(defaults.policy.embedded_subtitle_containers),
            },
            None => defaults.policy,
        };

        let (log_level, log_format) = match self.logging {
            Some(logging) => (
                logging.level,
                logging.format.unwrap_or(defaults.log_format),
            ),
            None => (defaults.log_level, defaults.log_format),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            library,
            policy,
            cors_enabled: self.server.cors_enabled.unwrap_or(defaults.cors_enabled),
            log_level,
            log_format,
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
