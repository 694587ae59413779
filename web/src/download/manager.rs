use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use ytclip::{ClipValidator, ClipWindow, DownloadError, DownloadOptions, PurgeReport};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::storage::{with_extension, ScratchStorage};

use super::bundle::bundle;
use super::command::{build_download_args, build_transcode_args};
use super::runner::ToolRunner;
use super::types::{Artifact, VideoMetadata};

/// Extensions yt-dlp uses for subtitle and thumbnail sidecars
const SIDECAR_EXTENSIONS: &[&str] = &["srt", "vtt", "ass", "jpg", "jpeg", "png", "webp"];

/// Drives one request from metadata lookup to the final artifact
pub struct DownloadManager {
    storage: Arc<ScratchStorage>,
    tools: ToolRunner,
    validator: ClipValidator,
}

impl DownloadManager {
    pub fn new(storage: Arc<ScratchStorage>, config: &Config) -> Self {
        Self {
            storage,
            tools: ToolRunner::new(&config.ytdlp_bin, &config.ffmpeg_bin),
            validator: ClipValidator::new(config.clip_limits()),
        }
    }

    /// Empty the scratch directory before a new download
    pub async fn purge_scratch(&self) -> PurgeReport {
        let report = self.storage.purge().await;
        if !report.is_clean() {
            warn!("Scratch purge left {} files behind", report.failed.len());
        }
        report
    }

    /// Metadata lookup. Failures here are reported as client errors.
    pub async fn fetch_info(&self, url: &str) -> Result<VideoMetadata> {
        let info = self.tools.fetch_info(url).await.map_err(AppError::InfoLookup)?;

        info!(
            "Fetched info for {}: '{}' ({}s)",
            url, info.title, info.duration_seconds
        );
        Ok(info)
    }

    /// Download, clip, transcode and package according to `options`
    pub async fn download(&self, options: &DownloadOptions) -> Result<Artifact> {
        let info = self.fetch_info(options.url()).await?;

        let clip = self.validator.validate(
            options.start_time(),
            options.end_time(),
            info.duration_seconds,
        )?;

        let stem = self.storage.artifact_stem(&info.title);
        let args = build_download_args(options, &stem);
        debug!("yt-dlp args: {}", args.join(" "));

        info!(
            "Downloading '{}' ({}, {}, mode {})",
            info.title,
            options.video_quality(),
            options.audio_quality(),
            options.download_mode()
        );
        self.tools.download(&args).await?;

        let files = self.storage.files_with_stem(&stem).await?;
        let source = find_source(&stem, &files)
            .ok_or_else(|| DownloadError::MissingOutput(with_extension(&stem, "mp4")))?;
        debug!("Downloaded source: {}", source.display());

        let output = self.transcode(options, clip, &stem, &source).await?;

        if !options.wants_sidecars() {
            return Ok(artifact(output));
        }

        let mut bundled = vec![output];
        bundled.extend(files.into_iter().filter(|path| is_sidecar(path)));

        let metadata = options.metadata().then_some(info);
        let archive = bundle(with_extension(&stem, "tar.gz"), bundled, metadata).await?;

        info!("Packaged bundle {}", archive.display());
        Ok(artifact(archive))
    }

    /// Run ffmpeg when the request needs it; otherwise hand back `source`
    async fn transcode(
        &self,
        options: &DownloadOptions,
        clip: Option<ClipWindow>,
        stem: &Path,
        source: &Path,
    ) -> Result<PathBuf> {
        let Some(output_args) = build_transcode_args(options, clip) else {
            return Ok(source.to_path_buf());
        };

        let suffix = if clip.is_some() { "clip" } else { "audio" };
        let extension = if options.wants_audio_output() { "mp3" } else { "mp4" };
        let mut name = stem.as_os_str().to_owned();
        name.push(format!("_{}", suffix));
        let output = with_extension(Path::new(&name), extension);

        if let Some(clip) = clip {
            info!(
                "Clipping {}s..{}s ({}s) with mode {}",
                clip.start(),
                clip.end(),
                clip.duration(),
                options.download_mode()
            );
        }
        debug!("ffmpeg output args: {}", output_args.join(" "));

        self.tools.transcode(source, &output_args, &output).await?;
        Ok(output)
    }
}

fn is_sidecar(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SIDECAR_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Pick the downloaded media file among everything sharing `stem`.
/// The merged `<stem>.mp4` wins; otherwise the first `<stem>.<ext>` that is
/// neither a sidecar nor a partial download.
fn find_source(stem: &Path, files: &[PathBuf]) -> Option<PathBuf> {
    let merged = with_extension(stem, "mp4");
    if files.contains(&merged) {
        return Some(merged);
    }

    let prefix = stem.file_name()?.to_string_lossy().into_owned();
    files
        .iter()
        .filter(|path| !is_sidecar(path))
        .find(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match name.strip_prefix(&prefix).and_then(|rest| rest.strip_prefix('.')) {
                Some(ext) => !ext.is_empty() && !ext.contains('.') && ext != "part",
                None => false,
            }
        })
        .cloned()
}

fn artifact(path: PathBuf) -> Artifact {
    let name = path.to_string_lossy();
    let content_type = if name.ends_with(".tar.gz") {
        "application/gzip".to_string()
    } else {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("mp4") => "video/mp4".to_string(),
            Some("mp3") => "audio/mpeg".to_string(),
            _ => mime_guess::from_path(&path).first_or_octet_stream().to_string(),
        }
    };

    Artifact { path, content_type }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(stem: &Path, suffixes: &[&str]) -> Vec<PathBuf> {
        let name = stem.to_string_lossy();
        suffixes
            .iter()
            .map(|suffix| PathBuf::from(format!("{}{}", name, suffix)))
            .collect()
    }

    #[test]
    fn test_find_source_prefers_merged_mp4() {
        let stem = PathBuf::from("/tmp/s/Title_20240101_000000");
        let files = paths(&stem, &[".en.srt", ".jpg", ".mp4", ".webm"]);
        assert_eq!(find_source(&stem, &files), Some(with_extension(&stem, "mp4")));
    }

    #[test]
    fn test_find_source_audio_download() {
        let stem = PathBuf::from("/tmp/s/Mr. Bean_20240101_000000");
        let files = paths(&stem, &[".m4a.part", ".webp", ".m4a"]);
        assert_eq!(find_source(&stem, &files), Some(with_extension(&stem, "m4a")));
    }

    #[test]
    fn test_find_source_ignores_sidecars_only() {
        let stem = PathBuf::from("/tmp/s/Title");
        let files = paths(&stem, &[".en.srt", ".fr.vtt", ".jpg"]);
        assert_eq!(find_source(&stem, &files), None);
    }

    #[test]
    fn test_is_sidecar() {
        assert!(is_sidecar(Path::new("a.en.srt")));
        assert!(is_sidecar(Path::new("a.JPG")));
        assert!(!is_sidecar(Path::new("a.mp4")));
        assert!(!is_sidecar(Path::new("a")));
    }

    #[test]
    fn test_artifact_content_types() {
        assert_eq!(artifact(PathBuf::from("/t/a_clip.mp4")).content_type, "video/mp4");
        assert_eq!(artifact(PathBuf::from("/t/a_audio.mp3")).content_type, "audio/mpeg");
        assert_eq!(artifact(PathBuf::from("/t/a.tar.gz")).content_type, "application/gzip");
        assert_eq!(artifact(PathBuf::from("/t/a.webm")).content_type, "video/webm");
    }

    /// Shell stand-ins for yt-dlp and ffmpeg. The yt-dlp script answers the
    /// metadata lookup and writes the merged file plus any requested sidecars;
    /// the ffmpeg script logs its arguments and writes its output path.
    #[cfg(unix)]
    struct FakeTools {
        _tools: tempfile::TempDir,
        scratch: tempfile::TempDir,
        ffmpeg_log: PathBuf,
        manager: DownloadManager,
    }

    #[cfg(unix)]
    impl FakeTools {
        async fn new() -> Self {
            use clap::Parser;
            use std::os::unix::fs::PermissionsExt;

            let tools = tempfile::tempdir().unwrap();
            let scratch = tempfile::tempdir().unwrap();
            let ffmpeg_log = tools.path().join("ffmpeg.log");

            let ytdlp = tools.path().join("yt-dlp");
            std::fs::write(
                &ytdlp,
                r#"#!/bin/sh
for arg in "$@"; do
  if [ "$arg" = "--dump-json" ]; then
    echo '{"title": "Test Clip", "duration": 120, "formats": [{"height": 720, "vcodec": "avc1"}]}'
    exit 0
  fi
done
out=""; prev=""; thumb=0; subs=0
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  if [ "$arg" = "--write-thumbnail" ]; then thumb=1; fi
  if [ "$arg" = "--write-subs" ]; then subs=1; fi
  prev="$arg"
done
stem="${out%.*}"
printf video > "$stem.mp4"
if [ $thumb = 1 ]; then printf jpg > "$stem.jpg"; fi
if [ $subs = 1 ]; then printf srt > "$stem.en.srt"; fi
exit 0
"#,
            )
            .unwrap();

            let ffmpeg = tools.path().join("ffmpeg");
            std::fs::write(
                &ffmpeg,
                format!(
                    "#!/bin/sh\necho \"$@\" >> '{}'\nfor last; do :; done\nprintf encoded > \"$last\"\nexit 0\n",
                    ffmpeg_log.display()
                ),
            )
            .unwrap();

            for script in [&ytdlp, &ffmpeg] {
                std::fs::set_permissions(script, std::fs::Permissions::from_mode(0o755)).unwrap();
            }

            let config = Config::parse_from([
                "ytclip-web",
                "--scratch-dir",
                scratch.path().to_str().unwrap(),
                "--ytdlp-bin",
                ytdlp.to_str().unwrap(),
                "--ffmpeg-bin",
                ffmpeg.to_str().unwrap(),
            ]);
            let storage = Arc::new(ScratchStorage::new(&config).await.unwrap());
            let manager = DownloadManager::new(storage, &config);

            Self {
                _tools: tools,
                scratch,
                ffmpeg_log,
                manager,
            }
        }

        async fn download(&self, body: serde_json::Value) -> Artifact {
            let mut body = body;
            body["url"] = serde_json::json!("https://youtu.be/abc");
            let options = ytclip::resolve_options(body.as_object().unwrap()).unwrap();
            self.manager.download(&options).await.unwrap()
        }

        fn ffmpeg_calls(&self) -> Vec<String> {
            std::fs::read_to_string(&self.ffmpeg_log)
                .map(|log| log.lines().map(str::to_string).collect())
                .unwrap_or_default()
        }
    }

    #[cfg(unix)]
    fn bundle_entries(path: &Path) -> Vec<String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clip_with_sidecars_is_bundled() {
        let tools = FakeTools::new().await;

        let artifact = tools
            .download(serde_json::json!({
                "start": 10,
                "end": 40,
                "thumbnail": true,
                "include_subtitles": true,
            }))
            .await;

        assert_eq!(artifact.content_type, "application/gzip");
        assert!(artifact.filename().starts_with("Test Clip_"));
        assert!(artifact.filename().ends_with(".tar.gz"));
        assert_eq!(artifact.path.parent().unwrap(), tools.scratch.path());

        let calls = tools.ffmpeg_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("-ss 10 -t 30"));

        let entries = bundle_entries(&artifact.path);
        assert_eq!(entries.len(), 4);
        assert!(entries[0].ends_with("_clip.mp4"));
        assert!(entries[1].ends_with(".en.srt"));
        assert!(entries[2].ends_with(".jpg"));
        assert_eq!(entries[3], crate::download::bundle::METADATA_ENTRY);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_audio_returns_mp3() {
        let tools = FakeTools::new().await;

        let artifact = tools
            .download(serde_json::json!({"extract_audio": true, "audio_quality": "128"}))
            .await;

        assert_eq!(artifact.content_type, "audio/mpeg");
        assert!(artifact.filename().ends_with("_audio.mp3"));
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"encoded");

        let calls = tools.ffmpeg_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("-vn -c:a libmp3lame -b:a 128k"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_full_video_is_returned_untouched() {
        let tools = FakeTools::new().await;

        let artifact = tools.download(serde_json::json!({"download_mode": "precise"})).await;

        assert_eq!(artifact.content_type, "video/mp4");
        assert!(artifact.filename().starts_with("Test Clip_"));
        assert!(!artifact.filename().contains("_clip"));
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"video");
        assert!(tools.ffmpeg_calls().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_bundle_without_metadata() {
        let tools = FakeTools::new().await;

        let artifact = tools
            .download(serde_json::json!({"thumbnail": true, "metadata": false}))
            .await;

        assert_eq!(artifact.content_type, "application/gzip");
        assert!(tools.ffmpeg_calls().is_empty());

        let entries = bundle_entries(&artifact.path);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with(".mp4"));
        assert!(entries[1].ends_with(".jpg"));
        assert!(!entries.iter().any(|name| name == "metadata.json"));
    }

    #[tokio::test]
    async fn test_download_rejects_unreachable_lookup_as_client_error() {
        use clap::Parser;

        let tmp = tempfile::tempdir().unwrap();
        let config = Config::parse_from([
            "ytclip-web",
            "--scratch-dir",
            tmp.path().to_str().unwrap(),
            "--ytdlp-bin",
            "/nonexistent/yt-dlp",
        ]);
        let storage = Arc::new(ScratchStorage::new(&config).await.unwrap());
        let manager = DownloadManager::new(storage, &config);

        let raw = serde_json::json!({"url": "https://youtu.be/abc"});
        let options = ytclip::resolve_options(raw.as_object().unwrap()).unwrap();

        let err = manager.download(&options).await.unwrap_err();
        assert!(matches!(err, AppError::InfoLookup(DownloadError::Extraction(_))));
    }
}
