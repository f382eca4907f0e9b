mod config;
mod errors;
mod export;
mod llm_client;
mod models;
mod review;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::renderer::HttpPdfRenderer;
use crate::export::token_store::TokenStore;
use crate::llm_client::OllamaClient;
use crate::review::service::ReviewService;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Review API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM gateway
    let gateway = OllamaClient::new(&config.llm).context("failed to build LLM client")?;
    info!(
        "LLM gateway initialized (endpoint: {}, default model: {})",
        config.llm.base_url, config.llm.default_model
    );

    let review = ReviewService::new(Arc::new(gateway), config.review.clone());
    info!(
        "Review pipeline: scoring={:?}, concurrency={}",
        config.review.scoring_mode, config.review.concurrency
    );

    // Initialize PDF export collaborators
    let renderer = HttpPdfRenderer::new(&config.export).context("failed to build PDF renderer")?;
    let tokens = Arc::new(TokenStore::new(config.export.token_ttl));
    info!("PDF renderer: {}", config.export.pdf_service_url);

    let cors = cors_layer(&config.cors_allowed_origins)?;

    // Build app state
    let state = AppState {
        review,
        tokens,
        renderer: Arc::new(renderer),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr} (api prefix {})", config.api_prefix);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive when no origins are configured, otherwise an exact allow-list.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any))
}
