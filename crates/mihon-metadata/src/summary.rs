//! Per-folder outcomes and the end-of-run tally.

use tracing::{info, warn};

/// What happened to one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Details and cover written
    Completed { title: String },
    /// Details written, cover missing
    CompletedWithoutCover { title: String, reason: String },
    /// `details.json` was already present
    SkippedExisting,
    /// The search returned no candidates
    NotFound,
    /// Listed in the exclusion config
    Excluded,
    /// Would have been looked up (dry run)
    DryRun,
    /// Lookup or details write failed
    Failed { reason: String },
}

/// A folder that failed, with the reason already logged during the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFolder {
    pub name: String,
    pub reason: String,
}

/// Statistics for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Succeeded folders that did not get a cover
    pub missing_cover: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failed: usize,
    pub failures: Vec<FailedFolder>,
}

impl RunSummary {
    /// Count one finished folder
    pub fn record(&mut self, name: &str, outcome: &FolderOutcome) {
        self.total += 1;

        match outcome {
            FolderOutcome::Completed { .. } => self.succeeded += 1,
            FolderOutcome::CompletedWithoutCover { .. } => {
                self.succeeded += 1;
                self.missing_cover += 1;
            }
            FolderOutcome::NotFound => {
                self.skipped += 1;
                self.not_found += 1;
            }
            FolderOutcome::SkippedExisting | FolderOutcome::Excluded | FolderOutcome::DryRun => {
                self.skipped += 1
            }
            FolderOutcome::Failed { reason } => {
                self.failed += 1;
                self.failures.push(FailedFolder {
                    name: name.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Log the final tally and the failure reasons
    pub fn log(&self) {
        info!("=== Summary ===");
        info!("Total directories: {}", self.total);
        info!(
            "Successfully processed: {} ({} without cover)",
            self.succeeded, self.missing_cover
        );
        info!("Skipped: {} ({} not found)", self.skipped, self.not_found);
        info!("Failed: {}", self.failed);

        for failure in &self.failures {
            warn!(folder = %failure.name, "Failed: {}", failure.reason);
        }
    }
}
