use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, error};

use ytclip::DownloadError;

use super::command::{build_ffmpeg_args, build_info_args};
use super::types::{RawVideoInfo, VideoMetadata};

/// Handle on the external yt-dlp and ffmpeg executables
#[derive(Debug, Clone)]
pub struct ToolRunner {
    ytdlp: PathBuf,
    ffmpeg: PathBuf,
}

impl ToolRunner {
    pub fn new(ytdlp: impl Into<PathBuf>, ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp: ytdlp.into(),
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Fetch video metadata without downloading anything
    pub async fn fetch_info(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        let output = run(&self.ytdlp, &build_info_args(url))
            .await
            .map_err(|e| DownloadError::Extraction(e.to_string()))?;

        if !output.status.success() {
            let message = first_stderr_line(&output);
            error!("Failed to extract video info: {}", message);
            return Err(DownloadError::Extraction(message));
        }

        let raw: RawVideoInfo = serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::Extraction(format!("invalid metadata: {}", e)))?;

        Ok(VideoMetadata::from_raw(raw, url))
    }

    /// Run yt-dlp with prepared download arguments
    pub async fn download(&self, args: &[String]) -> Result<(), DownloadError> {
        let output = run(&self.ytdlp, args)
            .await
            .map_err(|e| DownloadError::Download(e.to_string()))?;

        if !output.status.success() {
            let message = first_stderr_line(&output);
            error!("Download failed: {}", message);
            return Err(DownloadError::Download(message));
        }

        Ok(())
    }

    /// Run ffmpeg on `input`, writing `output`. A zero exit status without
    /// an output file still counts as a failure.
    pub async fn transcode(
        &self,
        input: &Path,
        output_args: &[String],
        output: &Path,
    ) -> Result<(), DownloadError> {
        let args = build_ffmpeg_args(input, output_args, output);
        let result = run(&self.ffmpeg, &args)
            .await
            .map_err(|e| DownloadError::Transcode(e.to_string()))?;

        if !result.status.success() {
            let message = first_stderr_line(&result);
            error!("Transcode failed: {}", message);
            return Err(DownloadError::Transcode(message));
        }

        if tokio::fs::metadata(output).await.is_err() {
            return Err(DownloadError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }
}

async fn run(program: &Path, args: &[String]) -> std::io::Result<Output> {
    debug!("Running {} {}", program.display(), args.join(" "));

    Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
}

fn first_stderr_line(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("process exited with {}", output.status))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_extraction_error() {
        let runner = ToolRunner::new("/nonexistent/yt-dlp", "/nonexistent/ffmpeg");
        let err = runner.fetch_info("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, DownloadError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_download_error() {
        // `false` ignores its arguments and exits 1
        let runner = ToolRunner::new("false", "false");
        let err = runner.download(&["x".to_string()]).await.unwrap_err();
        assert_eq!(err.to_string(), "Download failed: process exited with exit status: 1");
    }

    #[tokio::test]
    async fn test_transcode_without_output_is_missing_output() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("out.mp4");
        // `true` exits 0 without writing anything
        let runner = ToolRunner::new("true", "true");

        let err = runner
            .transcode(&tmp.path().join("in.mp4"), &[], &output)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::MissingOutput(path) if path == output));
    }
}
