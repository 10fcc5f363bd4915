use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use media_converter_core::{Pipeline, PipelineLimits};

mod handlers;
mod pages;

use handlers::AppState;

/// HTTP front end for the image converter
#[derive(Debug, Parser)]
#[command(name = "server", version, about)]
struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "MEDIA_CONVERTER_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,

    /// Largest accepted upload in MiB
    #[arg(long, env = "MEDIA_CONVERTER_MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,
}

impl ServerConfig {
    fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn app(pipeline: Pipeline) -> Router {
    // Multipart framing adds a little on top of the file itself.
    let body_limit = pipeline.limits().max_input_bytes.saturating_add(64 * 1024);
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/convert", post(handlers::convert))
        .route("/batch", get(handlers::batch_form).post(handlers::batch))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();

    let pipeline = Pipeline::standard().with_limits(PipelineLimits {
        max_input_bytes: config.max_upload_bytes(),
        ..PipelineLimits::default()
    });

    log::info!("🚀 Image Converter Server running on http://{}", config.addr);
    log::info!("📖 API endpoints:");
    log::info!("   GET  /        - Upload form");
    log::info!("   POST /convert - Convert and resize one image");
    log::info!("   GET  /batch   - Batch upload form");
    log::info!("   POST /batch   - Batch upload (not implemented)");
    log::info!("   GET  /health  - Health check");

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(listener, app(pipeline))
        .await
        .context("Server error")?;

    Ok(())
}
