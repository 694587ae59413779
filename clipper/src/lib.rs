// lib.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod clip;
pub mod duration;
pub mod error;
pub mod format;
pub mod options;
pub mod quality;
pub mod retention;
pub mod urls;

pub use clip::{ClipLimits, ClipValidator, ClipWindow};
pub use duration::{format_duration, format_duration_secs};
pub use error::{DownloadError, Result, ValidationError};
pub use format::{resolve_format_selector, resolve_transcode_args};
pub use options::{resolve_options, DownloadOptions};
pub use quality::{AudioQuality, DownloadMode, VideoQuality};
pub use retention::{PurgeReport, RetentionPolicy};
pub use urls::{validate_youtube_url, ALLOWED_DOMAINS};




#[cfg(test)]
mod quality_tests;
