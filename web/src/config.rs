use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use ytclip::clip::{DEFAULT_MAX_CLIP_DURATION, DEFAULT_MAX_VIDEO_DURATION, DEFAULT_MIN_CLIP_DURATION};
use ytclip::ClipLimits;

pub const MAX_RETENTION_HOURS: u64 = 24 * 365;
pub const MAX_SWEEP_INTERVAL_MINS: u64 = 60 * 24 * 7;
pub const MAX_PAYLOAD_MB: u64 = 4096;

/// HTTP API for downloading full or clipped YouTube videos
#[derive(Parser, Debug, Clone)]
#[command(name = "ytclip-web")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Server host address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Scratch directory for in-flight downloads
    #[arg(short, long, env = "SCRATCH_DIR", default_value = "temp_downloads")]
    pub scratch_dir: PathBuf,

    /// Longest clip that can be requested, in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_CLIP_DURATION)]
    pub max_clip_secs: u64,

    /// Shortest clip that can be requested, in seconds
    #[arg(long, default_value_t = DEFAULT_MIN_CLIP_DURATION)]
    pub min_clip_secs: u64,

    /// Longest source video accepted, in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_VIDEO_DURATION)]
    pub max_video_secs: u64,

    /// Age after which scratch files are swept, in hours (at most a year)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(0..=MAX_RETENTION_HOURS))]
    pub retention_hours: u64,

    /// Run the age-based sweep every N minutes (0 = never, at most a week)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=MAX_SWEEP_INTERVAL_MINS))]
    pub sweep_interval_mins: u64,

    /// Require the X-RapidAPI-Key and X-RapidAPI-Host headers
    #[arg(long, env = "REQUIRE_AUTH")]
    pub require_auth: bool,

    /// Maximum request body size in megabytes
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..=MAX_PAYLOAD_MB))]
    pub max_payload_mb: u64,

    /// yt-dlp executable
    #[arg(long, env = "YTDLP_BIN", default_value = "yt-dlp")]
    pub ytdlp_bin: PathBuf,

    /// ffmpeg executable
    #[arg(long, env = "FFMPEG_BIN", default_value = "ffmpeg")]
    pub ffmpeg_bin: PathBuf,
}

impl Config {
    pub fn max_payload_bytes(&self) -> usize {
        let bytes = self.max_payload_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }

    pub fn clip_limits(&self) -> ClipLimits {
        ClipLimits {
            max_clip_duration: self.max_clip_secs,
            min_clip_duration: self.min_clip_secs,
            max_video_duration: self.max_video_secs,
        }
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(3600))
    }

    /// `None` when the periodic sweep is disabled
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_mins > 0)
            .then(|| Duration::from_secs(self.sweep_interval_mins.saturating_mul(60)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["ytclip-web"])
    }
}
