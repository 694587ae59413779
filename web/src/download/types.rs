use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use ytclip::{format_duration_secs, VideoQuality};

/// Longest description returned by the info endpoint
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Subset of a `yt-dlp --dump-json` format entry
#[derive(Debug, Deserialize)]
pub struct RawFormat {
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub vcodec: Option<String>,
}

/// Subset of `yt-dlp --dump-json` output
#[derive(Debug, Deserialize)]
pub struct RawVideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<RawFormat>>,
}

/// Video metadata fetched before any download
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub duration_seconds: u64,
    pub uploader: String,
    pub upload_date: Option<String>,
    pub view_count: u64,
    pub description: String,
    pub thumbnail: Option<String>,
    pub webpage_url: String,
    /// Standard quality labels present in the format list, highest first
    pub available_qualities: Vec<String>,
}

impl VideoMetadata {
    pub fn from_raw(raw: RawVideoInfo, url: &str) -> Self {
        let qualities: BTreeSet<VideoQuality> = raw
            .formats
            .unwrap_or_default()
            .iter()
            .filter(|f| f.vcodec.as_deref() != Some("none"))
            .filter_map(|f| f.height.and_then(VideoQuality::from_height))
            .collect();

        Self {
            title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
            duration_seconds: raw.duration.map(|d| d.max(0.0).round() as u64).unwrap_or(0),
            uploader: raw.uploader.unwrap_or_else(|| "Unknown".to_string()),
            upload_date: raw.upload_date,
            view_count: raw.view_count.unwrap_or(0),
            description: raw.description.unwrap_or_default(),
            thumbnail: raw.thumbnail,
            webpage_url: raw.webpage_url.unwrap_or_else(|| url.to_string()),
            available_qualities: qualities.iter().map(|q| q.as_str().to_string()).collect(),
        }
    }
}

/// Payload of the info endpoint
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfoResponse {
    pub title: String,
    pub duration: u64,
    pub duration_formatted: String,
    pub uploader: String,
    pub upload_date: Option<String>,
    pub view_count: u64,
    pub description: String,
    pub thumbnail: Option<String>,
    pub webpage_url: String,
    pub available_qualities: Vec<String>,
}

impl From<&VideoMetadata> for VideoInfoResponse {
    fn from(info: &VideoMetadata) -> Self {
        Self {
            title: info.title.clone(),
            duration: info.duration_seconds,
            duration_formatted: format_duration_secs(info.duration_seconds),
            uploader: info.uploader.clone(),
            upload_date: info.upload_date.clone(),
            view_count: info.view_count,
            description: truncate_description(&info.description),
            thumbnail: info.thumbnail.clone(),
            webpage_url: info.webpage_url.clone(),
            available_qualities: info.available_qualities.clone(),
        }
    }
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        let head: String = description.chars().take(MAX_DESCRIPTION_LENGTH).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// Final file handed back to the caller
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub content_type: String,
}

impl Artifact {
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawVideoInfo {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_from_raw_defaults() {
        let info = VideoMetadata::from_raw(raw(serde_json::json!({})), "https://youtu.be/abc");

        assert_eq!(info.title, "Unknown");
        assert_eq!(info.duration_seconds, 0);
        assert_eq!(info.uploader, "Unknown");
        assert_eq!(info.view_count, 0);
        assert_eq!(info.webpage_url, "https://youtu.be/abc");
        assert!(info.available_qualities.is_empty());
    }

    #[test]
    fn test_available_qualities() {
        let info = VideoMetadata::from_raw(
            raw(serde_json::json!({
                "title": "Clip",
                "duration": 212.4,
                "formats": [
                    {"height": 360, "vcodec": "avc1"},
                    {"height": 1080, "vcodec": "vp9"},
                    {"height": 1080, "vcodec": "avc1"},
                    {"height": 144, "vcodec": "avc1"},
                    {"height": 720, "vcodec": "none"},
                    {"vcodec": "none"}
                ]
            })),
            "https://youtu.be/abc",
        );

        assert_eq!(info.duration_seconds, 212);
        assert_eq!(info.available_qualities, vec!["1080p", "360p"]);
    }

    #[test]
    fn test_info_response_truncates_description() {
        let mut info = VideoMetadata::from_raw(raw(serde_json::json!({"duration": 3661})), "u");
        info.description = "a".repeat(600);

        let response = VideoInfoResponse::from(&info);

        assert_eq!(response.duration_formatted, "01:01:01");
        assert_eq!(response.description.len(), MAX_DESCRIPTION_LENGTH + 3);
        assert!(response.description.ends_with("..."));
    }
}
