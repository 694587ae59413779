pub mod auth;
pub mod clips;

use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::error::{AppError, Result};

pub use clips::{download, health_check, home, info};

/// Fallback for unknown routes
pub async fn not_found() -> Result<HttpResponse> {
    Err(AppError::NotFound)
}

/// Fallback for known routes hit with the wrong method
pub async fn method_not_allowed() -> Result<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// JSON extractor settings; oversized bodies are turned into 413 by the handlers
pub fn json_config(config: &Config) -> web::JsonConfig {
    web::JsonConfig::default().limit(config.max_payload_bytes())
}

/// Configure API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(home))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/download")
            .route(web::post().to(download))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/info")
            .route(web::post().to(info))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/health")
            .route(web::get().to(health_check))
            .default_service(web::to(method_not_allowed)),
    );
}
