//! File path utilities for a manga folder.
//!
//! Mihon's local source expects fixed file names inside each title folder,
//! so every output path is derived from the folder root here.

use std::path::{Path, PathBuf};

/// File name of the metadata record
pub const DETAILS_FILE: &str = "details.json";

/// File name of the cover image, whatever the actual image encoding
pub const COVER_FILE: &str = "cover.jpg";

/// File path manager for one manga folder
#[derive(Debug, Clone)]
pub struct MangaPaths {
    root: PathBuf,
}

impl MangaPaths {
    /// Create a new MangaPaths for the given folder
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the `details.json` path
    pub fn details_json(&self) -> PathBuf {
        self.root.join(DETAILS_FILE)
    }

    /// Get the `cover.jpg` path
    pub fn cover_image(&self) -> PathBuf {
        self.root.join(COVER_FILE)
    }

    /// Whether a metadata record is already present
    pub fn has_details(&self) -> bool {
        self.details_json().is_file()
    }

    /// Whether a cover image is already present
    pub fn has_cover(&self) -> bool {
        self.cover_image().is_file()
    }
}
