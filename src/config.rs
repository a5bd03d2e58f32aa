use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::sync::bootstrap::RetryPolicy;

pub const CONFIG_VERSION: u64 = 1;

/// Environment variable that overrides the configured API url.
pub const API_URL_ENV: &str = "STUDYTRACK_API_URL";

const DEFAULT_API_URL: &str = "https://personalspacebackend.onrender.com/api/sections";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_bootstrap_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TrackerConfig {
    /// Full URL of the sections collection.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_bootstrap_retries")]
    pub bootstrap_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            bootstrap_retries: default_bootstrap_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            debug_logging: false,
        }
    }
}

impl TrackerConfig {
    /// `~/.config/studytrack/v1/config.json` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("studytrack")
            .join(format!("v{}", CONFIG_VERSION))
            .join("config.json")
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::default_path())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    /// Write the defaults to `path` unless a config already exists there.
    /// Returns true when a file was created.
    pub fn ensure_file_at(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(true)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.bootstrap_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}
