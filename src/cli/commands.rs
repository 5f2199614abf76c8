//! Command handlers for the CLI.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use campus_concierge::{create_router, ApiState, Config, DatasetStore, Query, QueryExecutor};
use tracing::{info, warn};

use super::output;

/// Load datasets from the configured directory.
///
/// A missing directory yields an empty store so the server still answers
/// with fallback messages.
pub fn load_store(config: &Config) -> Result<Arc<DatasetStore>> {
    let dir = config.data_dir();
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Dataset directory not found; starting with no datasets");
        return Ok(Arc::new(DatasetStore::default()));
    }
    let store = DatasetStore::load(&dir)
        .with_context(|| format!("Failed to load datasets from {}", dir.display()))?;
    Ok(Arc::new(store))
}

/// Run the HTTP server until interrupted.
pub async fn run_serve(config: Config) -> Result<()> {
    let store = load_store(&config)?;
    let summary = store.summary();
    info!(
        datasets = summary.datasets.len(),
        calendar = summary.calendar_count,
        faculty = summary.faculty_count,
        clubs = summary.club_count,
        skipped = summary.skipped_files,
        "Datasets loaded"
    );

    let executor = QueryExecutor::from_config(store, &config)?;
    info!(
        classifier = executor.classifier().strategy_name(),
        llm = config.llm.enabled,
        weather = config.weather.enabled,
        "Query pipeline ready"
    );

    let state = Arc::new(ApiState::new(Arc::new(executor)));
    let app = create_router(state, &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Answer one question and print it.
pub async fn run_ask(config: Config, text: String, category: Option<String>, json: bool) -> Result<()> {
    let store = load_store(&config)?;
    let executor = QueryExecutor::from_config(store, &config)?;

    let mut query = Query::new(text);
    if let Some(category) = &category {
        query = query.with_category(category);
    }
    let answer = executor.execute(&query).await;
    output::print_answer(&answer, json)
}

/// Print the intent a question is routed to.
pub async fn run_classify(config: Config, text: String, json: bool) -> Result<()> {
    let store = load_store(&config)?;
    let executor = QueryExecutor::from_config(store, &config)?;
    let intent = executor.classifier().classify(&Query::new(text)).await;
    output::print_intent(intent, executor.classifier().strategy_name(), json)
}

/// List loaded datasets and typed record counts.
pub fn run_datasets(config: Config, json: bool) -> Result<()> {
    let store = load_store(&config)?;
    output::print_summary(&store.summary(), json)
}
