//! Output files of a manga folder.
//!
//! `details.json` is written in one go. The cover is streamed through a
//! [`CoverFile`], which deletes what it wrote unless the download finishes.

use crate::error::{DownloadError, WriteError};
use shared::{DetailsRecord, MangaPaths};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Write `details.json`, replacing any existing file
pub fn write_details(paths: &MangaPaths, record: &DetailsRecord) -> Result<PathBuf, WriteError> {
    let path = paths.details_json();
    let content = record.to_json()?;

    std::fs::write(&path, content).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), "Details saved");
    Ok(path)
}

/// Cover image being written chunk by chunk
pub struct CoverFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl CoverFile {
    /// Create (or truncate) the cover file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, DownloadError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| DownloadError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            written: 0,
        })
    }

    /// Append raw bytes as received
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), DownloadError> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(chunk).map_err(|source| DownloadError::Io {
                path: self.path.clone(),
                source,
            })?;
            self.written += chunk.len() as u64;
        }
        Ok(())
    }

    /// Flush and keep the file, returning the number of bytes written.
    ///
    /// An empty body is an error and the file is removed.
    pub fn finish(mut self) -> Result<u64, DownloadError> {
        if self.written == 0 {
            return Err(DownloadError::EmptyBody);
        }

        if let Some(mut writer) = self.writer.take() {
            if let Err(source) = writer.flush() {
                drop(writer);
                self.discard();
                return Err(DownloadError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        debug!(path = %self.path.display(), bytes = self.written, "Cover saved");
        Ok(self.written)
    }

    fn discard(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove partial cover");
        }
    }
}

impl Drop for CoverFile {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            drop(writer);
            self.discard();
        }
    }
}
