use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ytclip_web::api::{configure_routes, json_config, not_found};
use ytclip_web::config::Config;
use ytclip_web::download::DownloadManager;
use ytclip_web::storage::{start_retention_sweeper, ScratchStorage};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ytclip=debug,ytclip_web=debug,actix_web=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse configuration
    let config = Config::parse();

    info!("ytclip-web starting...");
    info!("Server: {}:{}", config.host, config.port);
    info!("yt-dlp: {}", config.ytdlp_bin.display());
    info!("ffmpeg: {}", config.ffmpeg_bin.display());
    info!(
        "Authentication: {}",
        if config.require_auth { "required" } else { "disabled" }
    );

    // Initialize storage
    let storage = match ScratchStorage::new(&config).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    // Periodic sweep of files older than the retention window
    if let Some(interval) = config.sweep_interval() {
        info!("Retention sweep every {}s", interval.as_secs());
        let storage_clone = Arc::clone(&storage);
        tokio::spawn(async move {
            start_retention_sweeper(storage_clone, interval).await;
        });
    }

    let manager = Arc::new(DownloadManager::new(Arc::clone(&storage), &config));

    let bind_addr = format!("{}:{}", config.host, config.port);
    info!("Starting HTTP server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(json_config(&config))
            .app_data(web::Data::new(Arc::clone(&manager)))
            .app_data(web::Data::new(config.clone()))
            .configure(configure_routes)
            .default_service(web::to(not_found))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
