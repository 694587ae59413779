// retention.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, info, warn};

/// Default age after which scratch files are swept (2 hours)
pub const DEFAULT_MAX_FILE_AGE: Duration = Duration::from_secs(2 * 3600);

/// Outcome of a purge or sweep
#[derive(Debug, Default)]
pub struct PurgeReport {
    /// Files that were deleted
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl PurgeReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletion policy for the shared scratch directory.
///
/// Neither operation ever fails the caller: per-file errors are logged and
/// collected in the returned [`PurgeReport`].
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    dir: PathBuf,
    max_age: Duration,
}

impl RetentionPolicy {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete every regular file, recreating the directory if it is missing
    pub async fn force_purge(&self) -> PurgeReport {
        let mut report = PurgeReport::default();

        if fs::metadata(&self.dir).await.is_err() {
            if let Err(e) = fs::create_dir_all(&self.dir).await {
                warn!("Failed to create scratch dir {}: {}", self.dir.display(), e);
                report.failed.push((self.dir.clone(), e.to_string()));
            }
            return report;
        }

        self.remove_matching(&mut report, |_| true).await;
        info!("Cleanup completed: {} files removed", report.removed_count());
        report
    }

    /// Delete regular files last modified before `now - max_age`
    pub async fn sweep(&self) -> PurgeReport {
        let mut report = PurgeReport::default();

        let Some(cutoff) = SystemTime::now().checked_sub(self.max_age) else {
            return report;
        };

        if fs::metadata(&self.dir).await.is_err() {
            debug!("Scratch dir {} missing, nothing to sweep", self.dir.display());
            return report;
        }

        self.remove_matching(&mut report, |modified| modified < cutoff)
            .await;
        if report.removed_count() > 0 {
            info!("Swept {} old files", report.removed_count());
        }
        report
    }

    async fn remove_matching<F>(&self, report: &mut PurgeReport, should_remove: F)
    where
        F: Fn(SystemTime) -> bool,
    {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list scratch dir {}: {}", self.dir.display(), e);
                report.failed.push((self.dir.clone(), e.to_string()));
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read scratch dir entry: {}", e);
                    report.failed.push((self.dir.clone(), e.to_string()));
                    break;
                }
            };

            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Failed to stat {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            // A missing mtime never matches an age cutoff
            let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
            if !should_remove(modified) {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!("Cleaned up file: {}", path.display());
                    report.removed.push(path);
                }
                Err(e) => {
                    warn!("Error removing file {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }
    }
}
