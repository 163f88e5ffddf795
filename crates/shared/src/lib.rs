//! Shared library for the mihon-metadata workspace.
//!
//! This crate provides the support code used by the fetcher crate:
//! - Configuration management
//! - Logging infrastructure
//! - Per-folder output path conventions
//! - The persisted `details.json` model

pub mod config;
pub mod logging;
pub mod models;
pub mod paths;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
pub use paths::MangaPaths;
