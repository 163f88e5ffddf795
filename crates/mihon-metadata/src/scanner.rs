//! Discovery of manga folders.
//!
//! Every visible directory directly under the library root is a title. Files
//! are ignored and nothing below depth 1 is read.

use crate::error::ScanError;
use shared::MangaPaths;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A directory whose name is used as the search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MangaFolder {
    pub name: String,
    pub path: PathBuf,
}

impl MangaFolder {
    /// Output paths inside this folder
    pub fn paths(&self) -> MangaPaths {
        MangaPaths::new(&self.path)
    }
}

/// Folders found under the library root
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Folders to process, sorted by name
    pub folders: Vec<MangaFolder>,
    /// Folders matching the exclusion list, sorted by name
    pub excluded: Vec<MangaFolder>,
}

impl ScanResult {
    /// Number of directories seen, excluded ones included
    pub fn total(&self) -> usize {
        self.folders.len() + self.excluded.len()
    }
}

/// List the manga folders directly under `base`
pub fn scan(base: &Path, excluded_dirs: &[String]) -> Result<ScanResult, ScanError> {
    let entries = std::fs::read_dir(base).map_err(|source| {
        if base.exists() && !base.is_dir() {
            ScanError::NotADirectory {
                path: base.to_path_buf(),
            }
        } else {
            ScanError::Unreadable {
                path: base.to_path_buf(),
                source,
            }
        }
    })?;

    let mut result = ScanResult::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(base = %base.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            debug!(name = %name, "Skipping hidden directory");
            continue;
        }

        let folder = MangaFolder { name, path };
        if excluded_dirs.iter().any(|excluded| *excluded == folder.name) {
            result.excluded.push(folder);
        } else {
            result.folders.push(folder);
        }
    }

    result.folders.sort_by(|a, b| a.name.cmp(&b.name));
    result.excluded.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(result)
}
