use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use ytclip::DownloadError;

use super::types::VideoMetadata;

/// Name of the metadata entry inside a bundle
pub const METADATA_ENTRY: &str = "metadata.json";

/// Write `files` (flattened to their file names) and an optional
/// `metadata.json` into a gzip-compressed tarball at `output`.
pub fn write_bundle(
    output: &Path,
    files: &[PathBuf],
    metadata: Option<&VideoMetadata>,
) -> Result<(), DownloadError> {
    let file = File::create(output)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for path in files {
        let name = path
            .file_name()
            .ok_or_else(|| DownloadError::Packaging(format!("no file name: {}", path.display())))?;
        builder.append_path_with_name(path, name)?;
        debug!("Bundled {}", path.display());
    }

    if let Some(metadata) = metadata {
        let json = serde_json::to_vec_pretty(metadata)
            .map_err(|e| DownloadError::Packaging(e.to_string()))?;

        let mut header = tar::Header::new_gnu();
        header.set_size(json.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        );
        header.set_cksum();
        builder.append_data(&mut header, METADATA_ENTRY, json.as_slice())?;
    }

    builder.into_inner()?.finish()?;
    Ok(())
}

/// Async wrapper running [`write_bundle`] on the blocking pool
pub async fn bundle(
    output: PathBuf,
    files: Vec<PathBuf>,
    metadata: Option<VideoMetadata>,
) -> Result<PathBuf, DownloadError> {
    tokio::task::spawn_blocking(move || {
        write_bundle(&output, &files, metadata.as_ref())?;
        Ok(output)
    })
    .await
    .map_err(|e| DownloadError::Packaging(e.to_string()))?
}
