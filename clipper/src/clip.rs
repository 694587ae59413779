// clip.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use serde::Serialize;

use crate::duration::format_duration_secs;
use crate::error::{Result, ValidationError};

/// Longest clip that can be requested, in seconds (30 minutes)
pub const DEFAULT_MAX_CLIP_DURATION: u64 = 1800;

/// Shortest clip that can be requested, in seconds
pub const DEFAULT_MIN_CLIP_DURATION: u64 = 1;

/// Longest source video accepted at all, in seconds (4 hours)
pub const DEFAULT_MAX_VIDEO_DURATION: u64 = 14400;

/// Duration caps applied to clip requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipLimits {
    pub max_clip_duration: u64,
    pub min_clip_duration: u64,
    pub max_video_duration: u64,
}

impl Default for ClipLimits {
    fn default() -> Self {
        Self {
            max_clip_duration: DEFAULT_MAX_CLIP_DURATION,
            min_clip_duration: DEFAULT_MIN_CLIP_DURATION,
            max_video_duration: DEFAULT_MAX_VIDEO_DURATION,
        }
    }
}

/// A validated `[start, end)` range of the source video, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipWindow {
    start: u64,
    end: u64,
}

impl ClipWindow {
    /// Build a window without duration checks. `None` unless `start < end`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// Checks requested clip bounds against the fetched video duration
#[derive(Debug, Clone, Default)]
pub struct ClipValidator {
    limits: ClipLimits,
}

impl ClipValidator {
    pub fn new(limits: ClipLimits) -> Self {
        Self { limits }
    }

    /// Validate clip bounds. Returns `None` when the full video is requested.
    ///
    /// Rules are checked in order and the first violation is reported. The
    /// video length cap applies even when no clip is requested.
    pub fn validate(
        &self,
        start: Option<i64>,
        end: Option<i64>,
        total_duration: u64,
    ) -> Result<Option<ClipWindow>> {
        let limits = &self.limits;

        if total_duration > limits.max_video_duration {
            return Err(ValidationError::VideoTooLong {
                duration: format_duration_secs(total_duration),
                max: format_duration_secs(limits.max_video_duration),
            });
        }

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Ok(None),
        };

        if start < 0 || end < 0 {
            return Err(ValidationError::NegativeBounds);
        }

        if start >= end {
            return Err(ValidationError::StartNotBeforeEnd);
        }

        // Both bounds are known non-negative from here on
        let (start, end) = (start as u64, end as u64);

        if end > total_duration {
            return Err(ValidationError::EndBeyondDuration {
                end: format_duration_secs(end),
                duration: format_duration_secs(total_duration),
            });
        }

        let clip_duration = end - start;
        if clip_duration < limits.min_clip_duration {
            return Err(ValidationError::ClipTooShort(limits.min_clip_duration));
        }

        if clip_duration > limits.max_clip_duration {
            return Err(ValidationError::ClipTooLong {
                clip: format_duration_secs(clip_duration),
                max: format_duration_secs(limits.max_clip_duration),
            });
        }

        Ok(Some(ClipWindow { start, end }))
    }
}
