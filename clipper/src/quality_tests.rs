// quality_tests.rs
//
// Copyright 2026 Stéphane Cerveau <scerveau@igalia.com>
//
// This file is part of ytclip
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::quality::*;
use crate::urls::validate_youtube_url;

#[test]
fn test_video_quality_tokens_round_trip() {
    for token in VideoQuality::SUPPORTED {
        let quality: VideoQuality = token.parse().unwrap();
        assert_eq!(quality.as_str(), *token);
        assert_eq!(quality.to_string(), *token);
    }
}

#[test]
fn test_video_quality_heights() {
    assert_eq!(VideoQuality::Best.max_height(), None);
    assert_eq!(VideoQuality::Worst.max_height(), None);
    assert_eq!(VideoQuality::Uhd4k.max_height(), Some(2160));
    assert_eq!(VideoQuality::Ld.max_height(), Some(360));
    assert_eq!(VideoQuality::from_height(720), Some(VideoQuality::Hd));
    assert_eq!(VideoQuality::from_height(240), None);
}

#[test]
fn test_audio_quality_carries_bitrate() {
    assert_eq!("320".parse::<AudioQuality>().unwrap(), AudioQuality::Kbps(320));
    assert_eq!(AudioQuality::MEDIUM, AudioQuality::Kbps(192));
    assert_eq!(AudioQuality::Best.target_kbps(), 320);
    assert_eq!(AudioQuality::LOW.target_kbps(), 128);
    assert_eq!(AudioQuality::Worst.to_string(), "worst");
    assert!("256".parse::<AudioQuality>().is_err());
}

#[test]
fn test_download_mode_from_str() {
    assert_eq!("fast".parse::<DownloadMode>().unwrap(), DownloadMode::Fast);
    assert_eq!("Precise".parse::<DownloadMode>().unwrap(), DownloadMode::Precise);
    assert_eq!(
        "audio_only".parse::<DownloadMode>().unwrap(),
        DownloadMode::AudioOnly
    );
    assert!("".parse::<DownloadMode>().is_err());
    assert_eq!(DownloadMode::default(), DownloadMode::Balanced);
}

#[test]
fn test_enums_serialize_as_tokens() {
    assert_eq!(serde_json::to_string(&VideoQuality::Hd).unwrap(), "\"720p\"");
    assert_eq!(serde_json::to_string(&AudioQuality::HIGH).unwrap(), "\"320\"");
    assert_eq!(
        serde_json::to_string(&DownloadMode::AudioOnly).unwrap(),
        "\"audio_only\""
    );
}

#[test]
fn test_validate_youtube_url() {
    assert!(validate_youtube_url("https://www.youtube.com/watch?v=x"));
    assert!(validate_youtube_url("https://youtu.be/abc"));
    assert!(validate_youtube_url("https://MUSIC.YouTube.com/watch?v=x"));
    assert!(validate_youtube_url("http://gaming.youtube.com/"));

    assert!(!validate_youtube_url("https://vimeo.com/x"));
    assert!(!validate_youtube_url(""));
    assert!(!validate_youtube_url("not a url"));
    assert!(!validate_youtube_url("https://youtube.com.evil.example/watch?v=x"));
    assert!(!validate_youtube_url("https://notyoutube.com/watch?v=x"));
}
