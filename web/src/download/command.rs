use std::path::Path;

use ytclip::format::audio_extract_args;
use ytclip::{resolve_format_selector, resolve_transcode_args, ClipWindow, DownloadMode, DownloadOptions};

/// Subtitle language used when subtitles are requested without a list
pub const DEFAULT_SUBTITLE_LANGUAGE: &str = "en";

/// Container yt-dlp merges separate video/audio streams into
pub const MERGE_CONTAINER: &str = "mp4";

/// Build yt-dlp arguments for a metadata-only lookup
pub fn build_info_args(url: &str) -> Vec<String> {
    vec![
        "--dump-json".to_string(),
        "--no-download".to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--quiet".to_string(),
        url.to_string(),
    ]
}

/// Build yt-dlp arguments downloading the source (and sidecars) to `output_stem`.
///
/// yt-dlp appends the extension itself, so the output template is
/// `<stem>.%(ext)s`. Sidecars share the stem and get their own suffixes.
pub fn build_download_args(options: &DownloadOptions, output_stem: &Path) -> Vec<String> {
    let template = format!("{}.%(ext)s", output_stem.to_string_lossy());

    let mut args = vec![
        "-f".to_string(),
        resolve_format_selector(options),
        "-o".to_string(),
        template,
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--quiet".to_string(),
    ];

    if options.download_mode() != DownloadMode::AudioOnly {
        args.push("--merge-output-format".to_string());
        args.push(MERGE_CONTAINER.to_string());
    }

    if options.include_subtitles() {
        let languages = if options.subtitle_languages().is_empty() {
            DEFAULT_SUBTITLE_LANGUAGE.to_string()
        } else {
            options.subtitle_languages().join(",")
        };
        args.extend([
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            languages,
            "--convert-subs".to_string(),
            "srt".to_string(),
        ]);
    }

    if options.thumbnail() {
        args.extend([
            "--write-thumbnail".to_string(),
            "--convert-thumbnails".to_string(),
            "jpg".to_string(),
        ]);
    }

    args.push(options.url().to_string());
    args
}

/// ffmpeg output arguments for a request, or `None` when the downloaded
/// file can be returned untouched (full video, no audio extraction).
pub fn build_transcode_args(options: &DownloadOptions, clip: Option<ClipWindow>) -> Option<Vec<String>> {
    let mode = if options.wants_audio_output() {
        DownloadMode::AudioOnly
    } else {
        options.download_mode()
    };

    match (clip, mode) {
        (None, DownloadMode::AudioOnly) => Some(audio_extract_args(options.audio_quality())),
        (None, _) => None,
        (Some(clip), mode) => Some(resolve_transcode_args(mode, options.audio_quality(), Some(clip))),
    }
}

/// Full ffmpeg invocation: input, output arguments, output path
pub fn build_ffmpeg_args(input: &Path, output_args: &[String], output: &Path) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
    ];
    args.extend(output_args.iter().cloned());
    args.push(output.to_string_lossy().into_owned());
    args
}
