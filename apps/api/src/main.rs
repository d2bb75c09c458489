mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod profiles;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::generation::orchestrator::ResponseOrchestrator;
use crate::llm_client::GeminiClient;
use crate::profiles::PgProfileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LearnEmpower API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize generative provider
    let provider_config = config.provider_config();
    let provider_timeout = provider_config.timeout;
    let gemini = GeminiClient::new(provider_config).context("Failed to build Gemini client")?;
    info!(
        "Gemini client initialized (model: {}, timeout: {}s)",
        gemini.model(),
        provider_timeout.as_secs()
    );

    let state = AppState {
        profiles: Arc::new(PgProfileStore::new(db)),
        orchestrator: ResponseOrchestrator::new(Arc::new(gemini), provider_timeout),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
