use actix_web::error::{JsonPayloadError, PayloadError};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Local;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use ytclip::{
    format_duration_secs, resolve_options, validate_youtube_url, AudioQuality, DownloadMode,
    ValidationError, VideoQuality, ALLOWED_DOMAINS,
};

use crate::config::Config;
use crate::download::{DownloadManager, VideoInfoResponse};
use crate::error::{AppError, Result};

use super::auth::check_gateway_headers;

pub const SERVICE_NAME: &str = "YouTube Video Clipper API";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON body as extracted by actix, before any interpretation
pub type JsonBody = std::result::Result<web::Json<Value>, actix_web::Error>;

/// Turn the extracted body into a non-empty JSON object.
///
/// Oversized bodies become 413; anything else that is not a non-empty
/// object is reported as missing JSON.
pub fn json_object(body: JsonBody) -> Result<Map<String, Value>> {
    let body = match body {
        Ok(body) => body.into_inner(),
        Err(err) => {
            return Err(match err.as_error::<JsonPayloadError>() {
                Some(JsonPayloadError::Overflow { .. })
                | Some(JsonPayloadError::OverflowKnownLength { .. })
                | Some(JsonPayloadError::Payload(PayloadError::Overflow)) => {
                    AppError::PayloadTooLarge
                }
                _ => {
                    debug!("Rejected request body: {}", err);
                    AppError::MissingJson
                }
            })
        }
    };

    match body {
        Value::Object(map) if !map.is_empty() => Ok(map),
        _ => Err(AppError::MissingJson),
    }
}

/// GET / - Service description
pub async fn home(config: web::Data<Config>) -> HttpResponse {
    let limits = config.clip_limits();
    let second = if limits.min_clip_duration == 1 { "second" } else { "seconds" };

    HttpResponse::Ok().json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "description": "Download full or clipped videos from YouTube",
        "endpoints": {
            "/download": "POST - Download video with optional clipping",
            "/info": "POST - Get video information without downloading",
            "/health": "GET - Health check"
        },
        "parameters": {
            "url": "YouTube video URL (required)",
            "start": "Start time in seconds for clipping (optional)",
            "end": "End time in seconds for clipping (optional)",
            "video_quality": format!("Video quality: {} (optional, default: best)", VideoQuality::SUPPORTED.join(", ")),
            "audio_quality": format!("Audio quality: {} (optional, default: best)", AudioQuality::SUPPORTED.join(", ")),
            "download_mode": format!("Clipping mode: {} (optional, default: balanced)", DownloadMode::SUPPORTED.join(", ")),
            "extract_audio": "Return an mp3 instead of a video (optional, default: false)",
            "include_subtitles": "Bundle subtitles with the file (optional, default: false)",
            "subtitle_languages": "Subtitle languages, list or comma-separated (optional, default: en)",
            "thumbnail": "Bundle the thumbnail with the file (optional, default: false)",
            "metadata": "Add metadata.json to bundles (optional, default: true)",
            "custom_format": "Raw yt-dlp format selector, overrides the qualities (optional)"
        },
        "limits": {
            "max_clip_duration": format_duration_secs(limits.max_clip_duration),
            "min_clip_duration": format!("{} {}", limits.min_clip_duration, second),
            "max_video_duration": format_duration_secs(limits.max_video_duration),
            "max_payload_mb": config.max_payload_mb,
            "supported_qualities": VideoQuality::SUPPORTED,
            "supported_audio_qualities": AudioQuality::SUPPORTED,
            "supported_modes": DownloadMode::SUPPORTED,
            "supported_domains": ALLOWED_DOMAINS
        }
    }))
}

/// POST /download - Download a full video or a clip and return it as an attachment
pub async fn download(
    req: HttpRequest,
    body: JsonBody,
    manager: web::Data<Arc<DownloadManager>>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    check_gateway_headers(&req, &config)?;

    let report = manager.purge_scratch().await;
    debug!("Purged {} scratch files", report.removed_count());

    let raw = json_object(body)?;
    let options = resolve_options(&raw)?;

    info!("Download requested: {}", options.url());
    let artifact = manager.download(&options).await?;

    let filename = artifact.filename();
    info!("Serving {} ({})", filename, artifact.content_type);

    let content_type = artifact
        .content_type
        .parse::<mime_guess::mime::Mime>()
        .map_err(|_| AppError::Internal(format!("bad content type {}", artifact.content_type)))?;

    let file = actix_files::NamedFile::open_async(&artifact.path)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .set_content_type(content_type);

    Ok(file.into_response(&req))
}

/// POST /info - Video metadata without downloading
pub async fn info(
    req: HttpRequest,
    body: JsonBody,
    manager: web::Data<Arc<DownloadManager>>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    check_gateway_headers(&req, &config)?;

    let raw = json_object(body)?;
    let url = raw
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| validate_youtube_url(url))
        .ok_or(ValidationError::InvalidUrl)?;

    let metadata = manager.fetch_info(url).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "video_info": VideoInfoResponse::from(&metadata)
    })))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Local::now().to_rfc3339(),
        "version": SERVICE_VERSION
    }))
}
