// options.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

//! Resolution of raw request bodies into [`DownloadOptions`].
//!
//! Input is an untyped JSON object. Fields are checked in a fixed order
//! (URL, video quality, audio quality, download mode, subtitle languages,
//! then the remaining flags) and the first invalid field fails the whole
//! request. Unknown fields are ignored. Clip bounds are only typed here; their
//! range checks need the fetched video duration and live in [`crate::clip`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::quality::{AudioQuality, DownloadMode, VideoQuality};
use crate::urls::validate_youtube_url;

/// Fully validated options for one download request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOptions {
    url: String,
    start_time: Option<i64>,
    end_time: Option<i64>,
    video_quality: VideoQuality,
    audio_quality: AudioQuality,
    download_mode: DownloadMode,
    extract_audio: bool,
    include_subtitles: bool,
    subtitle_languages: Vec<String>,
    thumbnail: bool,
    metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_format: Option<String>,
}

impl DownloadOptions {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    pub fn video_quality(&self) -> VideoQuality {
        self.video_quality
    }

    pub fn audio_quality(&self) -> AudioQuality {
        self.audio_quality
    }

    pub fn download_mode(&self) -> DownloadMode {
        self.download_mode
    }

    pub fn extract_audio(&self) -> bool {
        self.extract_audio
    }

    pub fn include_subtitles(&self) -> bool {
        self.include_subtitles
    }

    pub fn subtitle_languages(&self) -> &[String] {
        &self.subtitle_languages
    }

    pub fn thumbnail(&self) -> bool {
        self.thumbnail
    }

    pub fn metadata(&self) -> bool {
        self.metadata
    }

    pub fn custom_format(&self) -> Option<&str> {
        self.custom_format.as_deref()
    }

    /// Whether the final artifact is an audio file
    pub fn wants_audio_output(&self) -> bool {
        self.extract_audio || self.download_mode == DownloadMode::AudioOnly
    }

    /// Whether sidecar files have to be bundled with the artifact
    pub fn wants_sidecars(&self) -> bool {
        self.include_subtitles || self.thumbnail
    }
}

/// Build [`DownloadOptions`] from a raw JSON request body.
pub fn resolve_options(raw: &Map<String, Value>) -> Result<DownloadOptions> {
    // A missing url is reported the same way as one outside the allow-list
    let url = match present(raw, "url") {
        Some(Value::String(url)) if validate_youtube_url(url.trim()) => url.trim().to_string(),
        _ => return Err(ValidationError::InvalidUrl),
    };

    let video_quality = match token(raw, "video_quality")? {
        Some(value) => value.parse::<VideoQuality>()?,
        None => VideoQuality::default(),
    };

    let audio_quality = match token(raw, "audio_quality")? {
        Some(value) => value.parse::<AudioQuality>()?,
        None => AudioQuality::default(),
    };

    let download_mode = match token(raw, "download_mode")? {
        Some(value) => value.parse::<DownloadMode>()?,
        None => DownloadMode::default(),
    };

    let subtitle_languages = subtitle_languages(raw)?;

    let extract_audio = flag(raw, "extract_audio", false)?;
    let include_subtitles = flag(raw, "include_subtitles", false)?;
    let thumbnail = flag(raw, "thumbnail", false)?;
    let metadata = flag(raw, "metadata", true)?;

    let start_time = clip_bound(raw, "start")?;
    let end_time = clip_bound(raw, "end")?;

    let custom_format = match present(raw, "custom_format") {
        None => None,
        Some(Value::String(format)) if format.trim().is_empty() => None,
        Some(Value::String(format)) => Some(format.clone()),
        Some(_) => {
            return Err(ValidationError::InvalidType {
                field: "custom_format",
                expected: "a string",
            })
        }
    };

    Ok(DownloadOptions {
        url,
        start_time,
        end_time,
        video_quality,
        audio_quality,
        download_mode,
        extract_audio,
        include_subtitles,
        subtitle_languages,
        thumbnail,
        metadata,
        custom_format,
    })
}

/// Field value, treating `null` as absent
fn present<'a>(raw: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    raw.get(field).filter(|value| !value.is_null())
}

/// Enum token. Numbers are accepted so that `"audio_quality": 192` works.
fn token(raw: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match present(raw, field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn flag(raw: &Map<String, Value>, field: &'static str, default: bool) -> Result<bool> {
    match present(raw, field) {
        None => Ok(default),
        Some(Value::Bool(value)) => Ok(*value),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a boolean",
        }),
    }
}

fn clip_bound(raw: &Map<String, Value>, field: &str) -> Result<Option<i64>> {
    match present(raw, field) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or(ValidationError::NonIntegerBounds),
    }
}

/// Accepts either `["en", "fr"]` or `"en, fr"`
fn subtitle_languages(raw: &Map<String, Value>) -> Result<Vec<String>> {
    const FIELD: &str = "subtitle_languages";
    const EXPECTED: &str = "an array of strings or a comma-separated string";

    let languages: Vec<String> = match present(raw, FIELD) {
        None => vec![],
        Some(Value::String(list)) => list.split(',').map(|s| s.trim().to_string()).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or(ValidationError::InvalidType {
                        field: FIELD,
                        expected: EXPECTED,
                    })
            })
            .collect::<Result<_>>()?,
        Some(_) => {
            return Err(ValidationError::InvalidType {
                field: FIELD,
                expected: EXPECTED,
            })
        }
    };

    Ok(languages.into_iter().filter(|l| !l.is_empty()).collect())
}
