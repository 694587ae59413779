use actix_web::HttpRequest;

use crate::config::Config;
use crate::error::{AppError, Result};

pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Reject the request when auth is enabled and either gateway header is
/// missing or empty. Header values are not verified.
pub fn check_gateway_headers(req: &HttpRequest, config: &Config) -> Result<()> {
    if !config.require_auth {
        return Ok(());
    }

    let present = |name: &str| {
        req.headers()
            .get(name)
            .map(|value| !value.as_bytes().is_empty())
            .unwrap_or(false)
    };

    if present(API_KEY_HEADER) && present(API_HOST_HEADER) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!(
            "{} and {} headers are required",
            API_KEY_HEADER, API_HOST_HEADER
        )))
    }
}
