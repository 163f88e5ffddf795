//! Where metadata comes from.

use crate::error::{DownloadError, LookupError};
use crate::lookup::SearchResult;
use async_trait::async_trait;
use std::path::Path;

/// A remote metadata provider.
///
/// Each method is one remote call; the caller applies the rate limit.
#[async_trait]
pub trait MetadataSource {
    /// Search by title and return the selected candidate, or `None` when
    /// nothing was found.
    async fn search(&mut self, title: &str) -> Result<Option<SearchResult>, LookupError>;

    /// Download a cover image into `dest`, returning the number of bytes.
    ///
    /// On failure `dest` must not be left behind.
    async fn download_cover(&mut self, url: &str, dest: &Path) -> Result<u64, DownloadError>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}
