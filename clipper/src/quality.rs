// quality.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Requested video quality, capped by frame height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum VideoQuality {
    #[default]
    Best,
    /// 2160p
    Uhd4k,
    /// 1440p
    Qhd2k,
    /// 1080p
    Fhd,
    /// 720p
    Hd,
    /// 480p
    Sd,
    /// 360p
    Ld,
    Worst,
}

impl VideoQuality {
    pub const SUPPORTED: &'static [&'static str] = &[
        "best", "2160p", "1440p", "1080p", "720p", "480p", "360p", "worst",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Best => "best",
            VideoQuality::Uhd4k => "2160p",
            VideoQuality::Qhd2k => "1440p",
            VideoQuality::Fhd => "1080p",
            VideoQuality::Hd => "720p",
            VideoQuality::Sd => "480p",
            VideoQuality::Ld => "360p",
            VideoQuality::Worst => "worst",
        }
    }

    /// Height cap in pixels, `None` for best/worst
    pub fn max_height(&self) -> Option<u32> {
        match self {
            VideoQuality::Best | VideoQuality::Worst => None,
            VideoQuality::Uhd4k => Some(2160),
            VideoQuality::Qhd2k => Some(1440),
            VideoQuality::Fhd => Some(1080),
            VideoQuality::Hd => Some(720),
            VideoQuality::Sd => Some(480),
            VideoQuality::Ld => Some(360),
        }
    }

    /// Map an exact rendition height to its quality label
    pub fn from_height(height: u32) -> Option<Self> {
        match height {
            2160 => Some(VideoQuality::Uhd4k),
            1440 => Some(VideoQuality::Qhd2k),
            1080 => Some(VideoQuality::Fhd),
            720 => Some(VideoQuality::Hd),
            480 => Some(VideoQuality::Sd),
            360 => Some(VideoQuality::Ld),
            _ => None,
        }
    }
}

impl FromStr for VideoQuality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(VideoQuality::Best),
            "2160p" => Ok(VideoQuality::Uhd4k),
            "1440p" => Ok(VideoQuality::Qhd2k),
            "1080p" => Ok(VideoQuality::Fhd),
            "720p" => Ok(VideoQuality::Hd),
            "480p" => Ok(VideoQuality::Sd),
            "360p" => Ok(VideoQuality::Ld),
            "worst" => Ok(VideoQuality::Worst),
            other => Err(ValidationError::UnsupportedValue {
                field: "video_quality",
                value: other.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested audio quality. Capped variants carry their bitrate in kbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioQuality {
    #[default]
    Best,
    Kbps(u32),
    Worst,
}

impl AudioQuality {
    pub const SUPPORTED: &'static [&'static str] = &["best", "320", "192", "128", "worst"];

    pub const HIGH: AudioQuality = AudioQuality::Kbps(320);
    pub const MEDIUM: AudioQuality = AudioQuality::Kbps(192);
    pub const LOW: AudioQuality = AudioQuality::Kbps(128);

    /// Bitrate used when the audio track has to be encoded
    pub fn target_kbps(&self) -> u32 {
        match self {
            AudioQuality::Best => 320,
            AudioQuality::Kbps(kbps) => *kbps,
            AudioQuality::Worst => 64,
        }
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioQuality::Best => write!(f, "best"),
            AudioQuality::Kbps(kbps) => write!(f, "{}", kbps),
            AudioQuality::Worst => write!(f, "worst"),
        }
    }
}

impl FromStr for AudioQuality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(AudioQuality::Best),
            "320" => Ok(AudioQuality::HIGH),
            "192" => Ok(AudioQuality::MEDIUM),
            "128" => Ok(AudioQuality::LOW),
            "worst" => Ok(AudioQuality::Worst),
            other => Err(ValidationError::UnsupportedValue {
                field: "audio_quality",
                value: other.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

/// Trade-off between clip speed and cut precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DownloadMode {
    /// Stream copy, cuts snap to keyframes
    Fast,
    /// Re-encode video, copy audio
    #[default]
    Balanced,
    /// Re-encode both tracks
    Precise,
    AudioOnly,
}

impl DownloadMode {
    pub const SUPPORTED: &'static [&'static str] = &["fast", "balanced", "precise", "audio_only"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadMode::Fast => "fast",
            DownloadMode::Balanced => "balanced",
            DownloadMode::Precise => "precise",
            DownloadMode::AudioOnly => "audio_only",
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(DownloadMode::Fast),
            "balanced" => Ok(DownloadMode::Balanced),
            "precise" => Ok(DownloadMode::Precise),
            "audio_only" => Ok(DownloadMode::AudioOnly),
            other => Err(ValidationError::UnsupportedValue {
                field: "download_mode",
                value: other.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

impl Serialize for VideoQuality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for AudioQuality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for DownloadMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
