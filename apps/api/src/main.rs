mod catalog;
mod chat;
mod config;
mod errors;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{CatalogPaths, CatalogStore};
use crate::chat::responder::{LlmResponder, Responder, TemplateResponder};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::{MatchingEngine, Vocabulary};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
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

    info!("Starting Lifeline API v{}", env!("CARGO_PKG_VERSION"));

    // Matching vocabulary: built-in tables unless an override file is configured
    let vocabulary = match &config.vocabulary_path {
        Some(path) => {
            info!("Loading vocabulary from {}", path.display());
            Vocabulary::from_toml_file(path)
                .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?
        }
        None => Vocabulary::default(),
    };
    let engine = Arc::new(MatchingEngine::new(vocabulary).context("Invalid vocabulary")?);
    info!("Matching engine initialized (scorer: {})", engine.scorer_backend());

    // Catalog snapshot
    let catalog = Arc::new(
        CatalogStore::load(CatalogPaths {
            resources: config.resources_path.clone(),
            question_bank: config.question_bank_path.clone(),
        })
        .context("Failed to load catalog")?,
    );

    // Responder: LLM-backed when an API key is present
    let responder: Arc<dyn Responder> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone()).context("Failed to build LLM client")?;
            info!("LLM responder initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmResponder::new(llm))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, using template responder");
            Arc::new(TemplateResponder)
        }
    };

    // Build app state
    let state = AppState {
        catalog,
        engine,
        responder,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the responder console has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
