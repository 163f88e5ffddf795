//! Jikan API client for manga search and cover downloads.

use super::types::SearchResponse;
use crate::error::{DownloadError, LookupError};
use crate::lookup::{build_search_result, select_candidate, SearchResult};
use crate::source::MetadataSource;
use crate::writer::CoverFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::config::FetcherConfig;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
    /// Candidates requested per search
    search_limit: u32,
    /// Candidate ordering
    order_by: String,
    /// Timeout for search requests
    search_timeout: Duration,
    /// Timeout for cover downloads
    cover_timeout: Duration,
    /// Append themes and demographics to genres
    include_themes: bool,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("mihon-metadata/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit.max(1),
            order_by: config.order_by.clone(),
            search_timeout: config.search_timeout(),
            cover_timeout: config.cover_timeout(),
            include_themes: config.include_themes,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run the manga search and return the raw candidates
    pub async fn search_manga(&self, title: &str) -> Result<SearchResponse, LookupError> {
        let url = format!("{}/manga", self.base_url);
        let limit = self.search_limit.to_string();

        debug!(url = %url, query = title, "Making API request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", title),
                ("limit", limit.as_str()),
                ("order_by", self.order_by.as_str()),
            ])
            .timeout(self.search_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            warn!(url = %url, status = %status, error = %body, "Request failed");
            return Err(LookupError::Http { status, body });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        debug!(url = %url, candidates = parsed.data.len(), "Request successful");
        Ok(parsed)
    }
}

#[async_trait]
impl MetadataSource for JikanClient {
    async fn search(&mut self, title: &str) -> Result<Option<SearchResult>, LookupError> {
        info!(query = title, "Searching");
        let response = self.search_manga(title).await?;

        let Some((entry, match_kind)) = select_candidate(title, &response.data) else {
            return Ok(None);
        };

        Ok(Some(build_search_result(entry, match_kind, self.include_themes)))
    }

    async fn download_cover(&mut self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        debug!(url = url, dest = %dest.display(), "Downloading cover");

        let mut response = self
            .client
            .get(url)
            .timeout(self.cover_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Http { status });
        }

        let mut cover = CoverFile::create(dest)?;
        while let Some(chunk) = response.chunk().await? {
            cover.write_chunk(&chunk)?;
        }

        cover.finish()
    }

    fn name(&self) -> &str {
        "Jikan API (MyAnimeList)"
    }
}
