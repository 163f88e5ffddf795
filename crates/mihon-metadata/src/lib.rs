//! Metadata fetcher for Mihon's local source.
//!
//! This library walks a directory of manga folders and writes the
//! `details.json` and `cover.jpg` files Mihon reads, using the Jikan API v4
//! (MyAnimeList) as the data source.

pub mod api;
pub mod error;
pub mod fetcher;
pub mod lookup;
pub mod scanner;
pub mod source;
pub mod summary;
pub mod writer;

pub use api::{JikanClient, RateLimiter};
pub use error::{DownloadError, LookupError, ScanError, WriteError};
pub use fetcher::{FetchOptions, MetadataFetcher};
pub use lookup::{MatchKind, SearchResult};
pub use scanner::{MangaFolder, ScanResult};
pub use source::MetadataSource;
pub use summary::{FolderOutcome, RunSummary};
