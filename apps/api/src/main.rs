mod config;
mod errors;
mod llm_client;
mod models;
mod recommendation;
mod roster;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recommendation::heuristics::Heuristics;
use crate::recommendation::pipeline::RecommendationPipeline;
use crate::roster::load_roster;
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

    info!("Starting Counsel Match v{}", env!("CARGO_PKG_VERSION"));

    // Load roster. A failure is kept in state so roster routes can report it.
    let roster = load_roster(&config.roster_path);
    match &roster {
        Ok(r) => info!("Roster ready: {} professionals", r.len()),
        Err(e) => error!("Roster unavailable ({}): {e}", e.code()),
    }

    // Load heuristics (built-in unless HEURISTICS_PATH is set)
    let heuristics = Heuristics::load(config.heuristics_path.as_deref())?;
    info!("Heuristics version: {}", heuristics.version);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
        config.generation_settings(),
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        llm.settings().model,
        llm.settings().temperature
    );

    let pipeline = RecommendationPipeline::new(
        Arc::new(llm),
        Arc::new(heuristics),
        config.llm_timeout,
    );

    // Build app state
    let state = AppState {
        roster: Arc::new(roster),
        pipeline,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
