//! Configuration management for mihon-metadata.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Metadata fetcher settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// Fixed pause after every remote call, in milliseconds
    pub request_delay_ms: u64,

    /// Number of search candidates requested per title
    pub search_limit: u32,

    /// Ordering of search candidates
    pub order_by: String,

    /// Timeout for search requests in seconds
    pub search_timeout_secs: u64,

    /// Timeout for cover downloads in seconds
    pub cover_timeout_secs: u64,

    /// Append themes and demographics to the genre list
    pub include_themes: bool,

    /// Folder names that are never treated as manga
    pub excluded_dirs: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jikan.moe/v4".to_string(),
            // Jikan allows 3 req/s and 60 req/min
            request_delay_ms: 1000,
            search_limit: 5,
            order_by: "popularity".to_string(),
            search_timeout_secs: 10,
            cover_timeout_secs: 15,
            include_themes: false,
            excluded_dirs: vec![
                "free maga downloader 2".to_string(),
                "Kindle Comic Converter".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl FetcherConfig {
    /// Pause applied after each remote call
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Timeout for search requests
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Timeout for cover downloads
    pub fn cover_timeout(&self) -> Duration {
        Duration::from_secs(self.cover_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file; `None` when the file is missing.
    ///
    /// Runs before the subscriber exists, so the caller logs the outcome.
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Some(config))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.logging.log_dir)
    }

    /// Parse the configured log level, falling back to INFO
    pub fn log_level(&self) -> tracing::Level {
        self.logging
            .default_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}
