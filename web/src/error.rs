use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use ytclip::{DownloadError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    /// Client-caused validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Metadata lookup failed before any download started
    #[error(transparent)]
    InfoLookup(DownloadError),

    /// Download, transcode or packaging failed
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Body missing, empty or not a JSON object
    #[error("No JSON data provided")]
    MissingJson,

    /// Required authentication headers are absent
    #[error("Authentication failed")]
    Unauthorized(String),

    #[error("Endpoint not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request payload too large")]
    PayloadTooLarge,

    /// Anything else; details are logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InfoLookup(_) | AppError::MissingJson => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Download(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthorized(message) => serde_json::json!({
                "error": self.to_string(),
                "message": message,
            }),
            AppError::Internal(detail) => {
                error!("Unexpected error: {}", detail);
                serde_json::json!({
                    "error": "An unexpected error occurred"
                })
            }
            _ => serde_json::json!({
                "error": self.to_string()
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
