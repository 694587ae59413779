// format.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::clip::ClipWindow;
use crate::options::DownloadOptions;
use crate::quality::{AudioQuality, DownloadMode, VideoQuality};

/// Container preferred for the video track when merging
pub const PREFERRED_VIDEO_CONTAINER: &str = "mp4";

/// Container preferred for the audio track when merging
pub const PREFERRED_AUDIO_CONTAINER: &str = "m4a";

/// Build the yt-dlp format selector for a request.
///
/// A custom format overrides everything and is passed through untouched.
/// Video selectors fall back from preferred containers, to any container, to
/// the generic `best` rendition.
pub fn resolve_format_selector(options: &DownloadOptions) -> String {
    if let Some(custom) = options.custom_format() {
        return custom.to_string();
    }

    if options.download_mode() == DownloadMode::AudioOnly {
        return audio_only_selector(options.audio_quality());
    }

    let video = video_fragment(options.video_quality());
    let audio = audio_fragment(options.audio_quality());

    format!(
        "{video}[ext={PREFERRED_VIDEO_CONTAINER}]+{audio}[ext={PREFERRED_AUDIO_CONTAINER}]/{video}+{audio}/best"
    )
}

fn audio_only_selector(quality: AudioQuality) -> String {
    match quality {
        AudioQuality::Best => "bestaudio/best".to_string(),
        AudioQuality::Worst => "worstaudio/worst".to_string(),
        AudioQuality::Kbps(kbps) => format!("bestaudio[abr<={kbps}]/bestaudio"),
    }
}

fn video_fragment(quality: VideoQuality) -> String {
    match (quality, quality.max_height()) {
        (VideoQuality::Worst, _) => "worstvideo".to_string(),
        (_, Some(height)) => format!("bestvideo[height<={height}]"),
        (_, None) => "bestvideo".to_string(),
    }
}

fn audio_fragment(quality: AudioQuality) -> String {
    match quality {
        AudioQuality::Best => "bestaudio".to_string(),
        AudioQuality::Worst => "worstaudio".to_string(),
        AudioQuality::Kbps(kbps) => format!("bestaudio[abr<={kbps}]"),
    }
}

/// Build the ffmpeg output arguments for a request.
///
/// The clip window is expressed as seek + duration (`-ss start -t length`),
/// never as an absolute end time.
pub fn resolve_transcode_args(
    mode: DownloadMode,
    audio_quality: AudioQuality,
    clip: Option<ClipWindow>,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    if let Some(clip) = clip {
        args.push("-ss".to_string());
        args.push(clip.start().to_string());
        args.push("-t".to_string());
        args.push(clip.duration().to_string());
    }

    let mode_args: Vec<String> = match mode {
        DownloadMode::Fast => strings(&[
            "-c:v",
            "copy",
            "-c:a",
            "copy",
            "-copyts",
            "-fflags",
            "+genpts",
            "-avoid_negative_ts",
            "make_zero",
        ]),
        DownloadMode::Balanced => strings(&[
            "-c:v",
            "libx264",
            "-preset",
            "fast",
            "-crf",
            "25",
            "-c:a",
            "copy",
            "-avoid_negative_ts",
            "make_zero",
        ]),
        DownloadMode::Precise => strings(&[
            "-c:v",
            "libx264",
            "-preset",
            "fast",
            "-crf",
            "23",
            "-c:a",
            "aac",
            "-b:a",
            "192k",
            "-avoid_negative_ts",
            "make_zero",
        ]),
        DownloadMode::AudioOnly => audio_extract_args(audio_quality),
    };

    args.extend(mode_args);
    args
}

/// Arguments to turn any input into an mp3 at the requested bitrate
pub fn audio_extract_args(audio_quality: AudioQuality) -> Vec<String> {
    vec![
        "-vn".to_string(),
        "-c:a".to_string(),
        "libmp3lame".to_string(),
        "-b:a".to_string(),
        format!("{}k", audio_quality.target_kbps()),
    ]
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
