//! Data models persisted next to the manga volumes.
//!
//! `details.json` follows the layout Mihon's local source reads in its
//! advanced mode. The status legend is written into every file so that a
//! person editing it by hand knows what the integers mean.

use serde::{Deserialize, Serialize};

/// Human-readable legend written under the `_status values` key.
pub const STATUS_LEGEND: [&str; 7] = [
    "0 = Unknown",
    "1 = Ongoing",
    "2 = Completed",
    "3 = Licensed",
    "4 = Publishing paused",
    "5 = Cancelled",
    "6 = On hiatus",
];

/// Publication status as understood by Mihon, stored as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum MihonStatus {
    #[default]
    Unknown,
    Ongoing,
    Completed,
    /// Never produced by a lookup; only reachable by editing the file.
    Licensed,
    /// Never produced by a lookup; only reachable by editing the file.
    PublishingPaused,
    Cancelled,
    OnHiatus,
}

impl MihonStatus {
    /// Integer code written to `details.json`.
    pub fn code(self) -> u8 {
        match self {
            MihonStatus::Unknown => 0,
            MihonStatus::Ongoing => 1,
            MihonStatus::Completed => 2,
            MihonStatus::Licensed => 3,
            MihonStatus::PublishingPaused => 4,
            MihonStatus::Cancelled => 5,
            MihonStatus::OnHiatus => 6,
        }
    }

    /// Map a MyAnimeList publication status string.
    ///
    /// Matching is case-insensitive. Anything unrecognised, including
    /// "Not yet published", becomes `Unknown`.
    pub fn from_mal(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return MihonStatus::Unknown;
        };

        match status.trim().to_lowercase().as_str() {
            "publishing" => MihonStatus::Ongoing,
            "finished" => MihonStatus::Completed,
            "on hiatus" => MihonStatus::OnHiatus,
            "discontinued" => MihonStatus::Cancelled,
            _ => MihonStatus::Unknown,
        }
    }
}

impl From<MihonStatus> for u8 {
    fn from(status: MihonStatus) -> Self {
        status.code()
    }
}

impl From<u8> for MihonStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => MihonStatus::Ongoing,
            2 => MihonStatus::Completed,
            3 => MihonStatus::Licensed,
            4 => MihonStatus::PublishingPaused,
            5 => MihonStatus::Cancelled,
            6 => MihonStatus::OnHiatus,
            _ => MihonStatus::Unknown,
        }
    }
}

impl std::fmt::Display for MihonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MihonStatus::Unknown => write!(f, "unknown"),
            MihonStatus::Ongoing => write!(f, "ongoing"),
            MihonStatus::Completed => write!(f, "completed"),
            MihonStatus::Licensed => write!(f, "licensed"),
            MihonStatus::PublishingPaused => write!(f, "publishing paused"),
            MihonStatus::Cancelled => write!(f, "cancelled"),
            MihonStatus::OnHiatus => write!(f, "on hiatus"),
        }
    }
}

/// Contents of a `details.json` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsRecord {
    pub title: String,
    pub author: String,
    pub artist: String,
    pub description: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub status: MihonStatus,
    #[serde(rename = "_status values", default = "status_legend")]
    pub status_values: Vec<String>,
}

fn status_legend() -> Vec<String> {
    STATUS_LEGEND.iter().map(|s| s.to_string()).collect()
}

impl DetailsRecord {
    /// Create a record with the fixed status legend attached
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        artist: impl Into<String>,
        description: impl Into<String>,
        genre: Vec<String>,
        status: MihonStatus,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            artist: artist.into(),
            description: description.into(),
            genre,
            status,
            status_values: status_legend(),
        }
    }

    /// Serialize as pretty-printed JSON (2-space indent, non-ASCII kept as-is)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
