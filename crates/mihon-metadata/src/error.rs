//! Error taxonomy of a run.
//!
//! Only `ScanError` ends a run. The others are caught at the folder boundary
//! and turned into a `FolderOutcome`.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// The base directory could not be listed
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read directory {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
}

/// The metadata search failed
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("search returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LookupError {
    /// Whether the API rejected the call for exceeding its rate limit
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LookupError::Http { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS)
    }
}

/// The cover image could not be saved
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no cover URL in metadata")]
    MissingUrl,

    #[error("cover download returned HTTP {status}")]
    Http { status: StatusCode },

    #[error("cover download failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cover download returned an empty body")]
    EmptyBody,

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `details.json` could not be written
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot serialize details: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
