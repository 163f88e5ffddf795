//! Main fetch loop.
//!
//! Folders are handled one at a time: skip check, search, `details.json`,
//! cover, with the rate limit applied after every remote call. Errors stop at
//! the folder boundary; only an unreadable library root ends the run.

use crate::api::RateLimiter;
use crate::error::{DownloadError, ScanError};
use crate::scanner::{self, MangaFolder};
use crate::source::MetadataSource;
use crate::summary::{FolderOutcome, RunSummary};
use crate::writer;
use std::path::Path;
use tracing::{error, info, warn};

/// Run options that do not belong to the metadata source
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Folder names never treated as manga
    pub excluded_dirs: Vec<String>,
    /// Report what would be fetched without calling the API or writing
    pub dry_run: bool,
}

/// Sequential metadata fetcher
pub struct MetadataFetcher<S> {
    source: S,
    rate_limiter: RateLimiter,
    options: FetchOptions,
}

impl<S: MetadataSource + Send> MetadataFetcher<S> {
    /// Create a new fetcher
    pub fn new(source: S, rate_limiter: RateLimiter, options: FetchOptions) -> Self {
        Self {
            source,
            rate_limiter,
            options,
        }
    }

    /// Access the metadata source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Remote calls made so far
    pub fn remote_calls(&self) -> u64 {
        self.rate_limiter.calls()
    }

    /// Process every manga folder under `base_dir`
    pub async fn run(&mut self, base_dir: &Path) -> Result<RunSummary, ScanError> {
        info!(
            base_dir = %base_dir.display(),
            source = self.source.name(),
            dry_run = self.options.dry_run,
            delay_ms = self.rate_limiter.delay().as_millis() as u64,
            "Starting metadata fetch"
        );

        let scan = scanner::scan(base_dir, &self.options.excluded_dirs)?;
        info!(directories = scan.total(), "Found directories to process");

        let mut summary = RunSummary::default();

        for folder in &scan.excluded {
            info!(folder = %folder.name, "Skipping non-manga directory");
            summary.record(&folder.name, &FolderOutcome::Excluded);
        }

        let count = scan.folders.len();
        for (idx, folder) in scan.folders.iter().enumerate() {
            info!(
                progress = format!("{}/{}", idx + 1, count),
                folder = %folder.name,
                "Processing"
            );

            let outcome = self.process_folder(folder).await;
            summary.record(&folder.name, &outcome);
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            remote_calls = self.rate_limiter.calls(),
            "Metadata fetch complete"
        );

        Ok(summary)
    }

    /// Resolve one folder and log its outcome
    pub async fn process_folder(&mut self, folder: &MangaFolder) -> FolderOutcome {
        let outcome = self.resolve_folder(folder).await;

        match &outcome {
            FolderOutcome::Completed { title } => {
                info!(folder = %folder.name, title = %title, "Metadata and cover saved");
            }
            FolderOutcome::CompletedWithoutCover { title, reason } => {
                warn!(
                    folder = %folder.name,
                    title = %title,
                    reason = %reason,
                    "Metadata saved without cover"
                );
            }
            FolderOutcome::SkippedExisting => {
                info!(folder = %folder.name, "Metadata already exists, skipping");
            }
            FolderOutcome::NotFound => {
                warn!(folder = %folder.name, "No results found, skipping");
            }
            FolderOutcome::Excluded => {
                info!(folder = %folder.name, "Skipping non-manga directory");
            }
            FolderOutcome::DryRun => {
                info!(folder = %folder.name, "Would search (dry run)");
            }
            FolderOutcome::Failed { reason } => {
                error!(folder = %folder.name, reason = %reason, "Failed to process folder");
            }
        }

        outcome
    }

    async fn resolve_folder(&mut self, folder: &MangaFolder) -> FolderOutcome {
        let paths = folder.paths();

        if paths.has_details() {
            return FolderOutcome::SkippedExisting;
        }

        if self.options.dry_run {
            return FolderOutcome::DryRun;
        }

        let searched = self.source.search(&folder.name).await;
        self.rate_limiter.pause().await;

        let result = match searched {
            Ok(Some(result)) => result,
            Ok(None) => return FolderOutcome::NotFound,
            Err(e) => {
                let reason = if e.is_rate_limited() {
                    format!("rate limited by API: {}", e)
                } else {
                    e.to_string()
                };
                return FolderOutcome::Failed { reason };
            }
        };

        info!(
            folder = %folder.name,
            title = %result.title,
            mal_id = result.mal_id,
            match_kind = result.match_kind.as_str(),
            status = %result.status,
            "Found"
        );
        if result.differs_from(&folder.name) {
            warn!(
                folder = %folder.name,
                title = %result.title,
                "Folder name differs from matched title"
            );
        }

        if let Err(e) = writer::write_details(&paths, &result.to_details()) {
            return FolderOutcome::Failed {
                reason: e.to_string(),
            };
        }

        let title = result.title;

        if paths.has_cover() {
            info!(folder = %folder.name, "Keeping existing cover");
            return FolderOutcome::Completed { title };
        }

        let Some(url) = result.cover_url else {
            return FolderOutcome::CompletedWithoutCover {
                title,
                reason: DownloadError::MissingUrl.to_string(),
            };
        };

        let downloaded = self.source.download_cover(&url, &paths.cover_image()).await;
        self.rate_limiter.pause().await;

        match downloaded {
            Ok(_) => FolderOutcome::Completed { title },
            Err(e) => FolderOutcome::CompletedWithoutCover {
                title,
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::lookup::{MatchKind, SearchResult};
    use crate::writer::CoverFile;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use shared::{DetailsRecord, MangaPaths, MihonStatus};
    use std::collections::HashMap;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Canned answers keyed by title, recording every call
    #[derive(Default)]
    struct FakeSource {
        results: HashMap<String, Result<Option<SearchResult>, StatusCode>>,
        covers: HashMap<String, Result<Vec<u8>, StatusCode>>,
        searches: Vec<(String, Instant)>,
        downloads: Vec<String>,
    }

    impl FakeSource {
        fn with_result(mut self, folder: &str, result: SearchResult) -> Self {
            self.results.insert(folder.to_string(), Ok(Some(result)));
            self
        }

        fn with_search_error(mut self, folder: &str, status: StatusCode) -> Self {
            self.results.insert(folder.to_string(), Err(status));
            self
        }

        fn with_cover(mut self, url: &str, cover: Result<Vec<u8>, StatusCode>) -> Self {
            self.covers.insert(url.to_string(), cover);
            self
        }
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn search(&mut self, title: &str) -> Result<Option<SearchResult>, LookupError> {
            self.searches.push((title.to_string(), Instant::now()));

            match self.results.get(title) {
                Some(Ok(result)) => Ok(result.clone()),
                Some(Err(status)) => Err(LookupError::Http {
                    status: *status,
                    body: String::new(),
                }),
                None => Ok(None),
            }
        }

        async fn download_cover(&mut self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
            self.downloads.push(url.to_string());

            match self.covers.get(url) {
                Some(Ok(bytes)) => {
                    let mut cover = CoverFile::create(dest)?;
                    cover.write_chunk(bytes)?;
                    cover.finish()
                }
                Some(Err(status)) => Err(DownloadError::Http { status: *status }),
                None => Err(DownloadError::Http {
                    status: StatusCode::NOT_FOUND,
                }),
            }
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn search_result(title: &str, cover_url: Option<&str>) -> SearchResult {
        SearchResult {
            mal_id: 2,
            title: title.to_string(),
            author: "Miura, Kentarou".to_string(),
            artist: "Miura, Kentarou".to_string(),
            description: "Guts, a former mercenary...".to_string(),
            genres: vec!["Action".to_string(), "Adventure".to_string()],
            status: MihonStatus::OnHiatus,
            cover_url: cover_url.map(str::to_string),
            match_kind: MatchKind::Exact,
        }
    }

    fn fetcher(source: FakeSource, delay: Duration) -> MetadataFetcher<FakeSource> {
        MetadataFetcher::new(source, RateLimiter::new(delay), FetchOptions::default())
    }

    fn library(folders: &[&str]) -> anyhow::Result<TempDir> {
        let temp_dir = TempDir::new()?;
        for folder in folders {
            std::fs::create_dir(temp_dir.path().join(folder))?;
        }
        Ok(temp_dir)
    }

    const COVER_URL: &str = "https://cdn.example/berserk.jpg";

    #[tokio::test]
    async fn test_berserk_gets_details_and_cover() -> anyhow::Result<()> {
        let library = library(&["Berserk"])?;
        let source = FakeSource::default()
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)))
            .with_cover(COVER_URL, Ok(b"\xff\xd8\xff\xe0cover".to_vec()));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.missing_cover, 0);

        let paths = MangaPaths::new(library.path().join("Berserk"));
        let details: DetailsRecord =
            serde_json::from_str(&std::fs::read_to_string(paths.details_json())?)?;
        assert_eq!(details.title, "Berserk");
        assert!(details.status.code() <= 6);
        assert_eq!(details.genre, vec!["Action", "Adventure"]);

        let cover = std::fs::read(paths.cover_image())?;
        assert!(!cover.is_empty());
        assert_eq!(fetcher.remote_calls(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_existing_details_are_untouched() -> anyhow::Result<()> {
        let library = library(&["Berserk"])?;
        let paths = MangaPaths::new(library.path().join("Berserk"));
        let original = b"{\"title\": \"Berserk (hand edited)\", \"status\": 3}";
        std::fs::write(paths.details_json(), original)?;

        let source = FakeSource::default()
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)))
            .with_cover(COVER_URL, Ok(b"cover".to_vec()));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.skipped, 1);
        assert!(fetcher.source().searches.is_empty());
        assert!(fetcher.source().downloads.is_empty());
        assert_eq!(std::fs::read(paths.details_json())?, original);
        assert!(!paths.has_cover());

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_title_creates_nothing() -> anyhow::Result<()> {
        let library = library(&["Some Totally Unknown Title Xyzzy123"])?;

        let mut fetcher = fetcher(FakeSource::default(), Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.failed, 0);

        let paths = MangaPaths::new(library.path().join("Some Totally Unknown Title Xyzzy123"));
        assert!(!paths.has_details());
        assert!(!paths.has_cover());

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_cover_keeps_details() -> anyhow::Result<()> {
        let library = library(&["Berserk"])?;
        let source = FakeSource::default()
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)))
            .with_cover(COVER_URL, Err(StatusCode::BAD_GATEWAY));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.missing_cover, 1);
        assert_eq!(summary.failed, 0);

        let paths = MangaPaths::new(library.path().join("Berserk"));
        assert!(paths.has_details());
        assert!(!paths.has_cover());

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cover_body_leaves_no_file() -> anyhow::Result<()> {
        let library = library(&["Berserk"])?;
        let source = FakeSource::default()
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)))
            .with_cover(COVER_URL, Ok(Vec::new()));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.missing_cover, 1);
        let paths = MangaPaths::new(library.path().join("Berserk"));
        assert!(paths.has_details());
        assert!(!paths.has_cover());

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_cover_url_is_partial_success() -> anyhow::Result<()> {
        let library = library(&["Berserk"])?;
        let source =
            FakeSource::default().with_result("Berserk", search_result("Berserk", None));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.missing_cover, 1);
        assert!(fetcher.source().downloads.is_empty());
        assert_eq!(fetcher.remote_calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_existing_cover_is_kept() -> anyhow::Result<()> {
        let library = library(&["Berserk"])?;
        let paths = MangaPaths::new(library.path().join("Berserk"));
        std::fs::write(paths.cover_image(), b"my own scan")?;

        let source = FakeSource::default()
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)))
            .with_cover(COVER_URL, Ok(b"remote".to_vec()));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.missing_cover, 0);
        assert!(fetcher.source().downloads.is_empty());
        assert_eq!(std::fs::read(paths.cover_image())?, b"my own scan");

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_error_does_not_abort_run() -> anyhow::Result<()> {
        let library = library(&["Akira", "Berserk"])?;
        let source = FakeSource::default()
            .with_search_error("Akira", StatusCode::TOO_MANY_REQUESTS)
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)))
            .with_cover(COVER_URL, Ok(b"cover".to_vec()));

        let mut fetcher = fetcher(source, Duration::ZERO);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failures[0].name, "Akira");
        assert!(summary.failures[0].reason.contains("rate limited"));
        assert!(!MangaPaths::new(library.path().join("Akira")).has_details());

        Ok(())
    }

    #[tokio::test]
    async fn test_lookups_are_spaced_by_delay() -> anyhow::Result<()> {
        let library = library(&["Akira", "Berserk"])?;
        let delay = Duration::from_millis(150);

        let mut fetcher = fetcher(FakeSource::default(), delay);
        fetcher.run(library.path()).await?;

        let searches = &fetcher.source().searches;
        assert_eq!(searches.len(), 2);
        assert_eq!(searches[0].0, "Akira");
        assert_eq!(searches[1].0, "Berserk");
        assert!(searches[1].1.duration_since(searches[0].1) >= delay);

        Ok(())
    }

    #[tokio::test]
    async fn test_excluded_and_dry_run() -> anyhow::Result<()> {
        let library = library(&["Berserk", "Kindle Comic Converter"])?;
        let source = FakeSource::default()
            .with_result("Berserk", search_result("Berserk", Some(COVER_URL)));

        let options = FetchOptions {
            excluded_dirs: vec!["Kindle Comic Converter".to_string()],
            dry_run: true,
        };
        let mut fetcher = MetadataFetcher::new(source, RateLimiter::new(Duration::ZERO), options);
        let summary = fetcher.run(library.path()).await?;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.skipped, 2);
        assert!(fetcher.source().searches.is_empty());
        assert!(!MangaPaths::new(library.path().join("Berserk")).has_details());

        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_base_is_fatal() {
        let mut fetcher = fetcher(FakeSource::default(), Duration::ZERO);
        let result = fetcher.run(Path::new("/definitely/not/a/library")).await;

        assert!(result.is_err());
    }
}
