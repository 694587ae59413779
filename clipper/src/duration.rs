// duration.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

/// Format a second count as `HH:MM:SS`. Zero and negative values yield `00:00:00`.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "00:00:00".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Same as [`format_duration`] for unsigned counts (durations reported by extractors).
pub fn format_duration_secs(seconds: u64) -> String {
    format_duration(i64::try_from(seconds).unwrap_or(i64::MAX))
}
