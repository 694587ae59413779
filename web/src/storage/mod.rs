use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use ytclip::{DownloadError, PurgeReport, RetentionPolicy};

use crate::config::Config;

/// Longest title fragment kept in generated filenames
pub const MAX_TITLE_LENGTH: usize = 100;

/// Storage manager for the shared scratch directory.
///
/// The directory holds at most the artifacts of the request currently being
/// served: it is force-purged at the start of every download.
pub struct ScratchStorage {
    policy: RetentionPolicy,
}

impl ScratchStorage {
    /// Create the storage manager and ensure the directory exists
    pub async fn new(config: &Config) -> Result<Self, DownloadError> {
        fs::create_dir_all(&config.scratch_dir).await?;

        info!(
            "Scratch storage initialized: {} (retention {}h)",
            config.scratch_dir.display(),
            config.retention_hours
        );

        Ok(Self {
            policy: RetentionPolicy::new(&config.scratch_dir, config.retention()),
        })
    }

    pub fn dir(&self) -> &Path {
        self.policy.dir()
    }

    /// Remove every file before a new download starts
    pub async fn purge(&self) -> PurgeReport {
        self.policy.force_purge().await
    }

    /// Remove files older than the retention window
    pub async fn sweep(&self) -> PurgeReport {
        self.policy.sweep().await
    }

    /// Base path (no extension) for a new artifact named after the video title
    pub fn artifact_stem(&self, title: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        self.dir()
            .join(format!("{}_{}", sanitize_title(title), timestamp))
    }

    /// Every file in the scratch directory whose name starts with `stem`
    pub async fn files_with_stem(&self, stem: &Path) -> Result<Vec<PathBuf>, DownloadError> {
        let prefix = stem
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut files = Vec::new();
        let mut entries = fs::read_dir(self.dir()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) && entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        debug!("Found {} files for {}", files.len(), prefix);
        Ok(files)
    }
}

/// Append an extension to an artifact stem. Titles may contain dots, so
/// `Path::with_extension` cannot be used.
pub fn with_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Replace characters invalid in filenames, trim, and cap the length
pub fn sanitize_title(title: &str) -> String {
    let options = sanitize_filename::Options {
        replacement: "_",
        ..Default::default()
    };
    let sanitized = sanitize_filename::sanitize_with_options(title, options);
    let trimmed: String = sanitized.trim().chars().take(MAX_TITLE_LENGTH).collect();

    if trimmed.is_empty() {
        "video".to_string()
    } else {
        trimmed
    }
}

/// Periodically sweep files older than the retention window
pub async fn start_retention_sweeper(storage: Arc<ScratchStorage>, interval: Duration) {
    let mut interval_timer = tokio::time::interval(interval);

    loop {
        interval_timer.tick().await;
        storage.sweep().await;
    }
}
