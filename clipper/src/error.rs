// error.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use thiserror::Error;

/// Client-caused failures. Messages are safe to return to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Invalid {field} '{value}'. Supported values: {}", supported.join(", "))]
    UnsupportedValue {
        field: &'static str,
        value: String,
        supported: &'static [&'static str],
    },

    #[error("Invalid type for '{field}': expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Video duration ({duration}) exceeds maximum allowed duration ({max})")]
    VideoTooLong { duration: String, max: String },

    #[error("Start and end times must be integers")]
    NonIntegerBounds,

    #[error("Start and end times must be non-negative")]
    NegativeBounds,

    #[error("Start time must be less than end time")]
    StartNotBeforeEnd,

    #[error("End time ({end}) exceeds video duration ({duration})")]
    EndBeyondDuration { end: String, duration: String },

    #[error("Clip duration must be at least {0} second(s)")]
    ClipTooShort(u64),

    #[error("Clip duration ({clip}) cannot exceed maximum allowed ({max})")]
    ClipTooLong { clip: String, max: String },
}

/// Failures of the external extraction / transcoding collaborators.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to extract video information: {0}")]
    Extraction(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Output file was not created: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Packaging failed: {0}")]
    Packaging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
