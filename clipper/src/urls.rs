// urls.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use url::Url;

/// Hosts accepted as video sources
pub const ALLOWED_DOMAINS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "youtu.be",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
];

/// Check whether a URL points at one of the allowed video hosts.
///
/// Only the host is compared (exact, case-insensitive). Scheme, path and
/// reachability are not checked. Any parse failure yields `false`.
pub fn validate_youtube_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| {
                let host = host.to_ascii_lowercase();
                ALLOWED_DOMAINS.contains(&host.as_str())
            })
            .unwrap_or(false),
        Err(_) => false,
    }
}
