//! Mihon metadata fetcher CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use mihon_metadata::{FetchOptions, JikanClient, MetadataFetcher, MetadataSource, RateLimiter};
use shared::Config;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Library directory containing one folder per manga
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Show what would be fetched without calling the API or writing files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let loaded = Config::try_from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let config_found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "mihon-metadata".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    if config_found {
        info!(path = %args.config.display(), "Configuration loaded successfully");
    } else {
        warn!(path = %args.config.display(), "Config file not found, using defaults");
    }

    let base_dir = std::fs::canonicalize(&args.dir)
        .with_context(|| format!("Cannot read library directory {}", args.dir.display()))?;

    let client = JikanClient::new(&config.fetcher).context("Failed to create Jikan client")?;

    println!("{}", "=".repeat(60));
    println!("Manga Metadata Fetcher for Mihon");
    println!("{}", "=".repeat(60));
    println!("Working directory: {}", base_dir.display());
    println!("Data source: {}", client.name());
    println!("{}", "=".repeat(60));

    if !args.yes && !args.dry_run && std::io::stdin().is_terminal() && !confirm()? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let mut excluded_dirs = config.fetcher.excluded_dirs.clone();
    if config.logging.file {
        if let Some(name) = log_dir_name(&base_dir, &config.log_dir()) {
            excluded_dirs.push(name);
        }
    }

    let mut fetcher = MetadataFetcher::new(
        client,
        RateLimiter::new(config.fetcher.request_delay()),
        FetchOptions {
            excluded_dirs,
            dry_run: args.dry_run,
        },
    );

    let summary = fetcher
        .run(&base_dir)
        .await
        .context("Metadata fetch failed")?;

    summary.log();
    info!("Done. Check the log above for any errors.");

    Ok(())
}

/// Ask before touching the library
fn confirm() -> Result<bool> {
    print!("Do you want to proceed? (y/n): ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Name of the log directory when it sits directly inside the library
fn log_dir_name(base_dir: &Path, log_dir: &Path) -> Option<String> {
    let log_dir = std::fs::canonicalize(log_dir).ok()?;
    if log_dir.parent()? == base_dir {
        log_dir.file_name().map(|name| name.to_string_lossy().into_owned())
    } else {
        None
    }
}
