use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod backup;
mod config;
mod domain;
mod metrics;
mod store;

use backup::BackupMirror;
use config::Config;
use domain::action::ActionCommandHandler;
use store::{ActionStore, InMemoryActionStore, PostgresActionStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sustainability_actions=debug")),
        )
        .init();

    tracing::info!("🌱 Starting sustainability actions service");

    // === 1. Configuration ===
    let config = Config::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        backup_path = %config.backup_path.display(),
        metrics_addr = %config.metrics_addr(),
        "Configuration loaded"
    );

    // === 2. Record Store ===
    let store: Arc<dyn ActionStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to Postgres...");
            let store = PostgresActionStore::connect(url, config.db_max_connections).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data lives only as long as the process)");
            Arc::new(InMemoryActionStore::new())
        }
    };

    // === 3. Metrics ===
    let metrics = Arc::new(metrics::ServiceMetrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());
    let metrics_registry = Arc::new(metrics.registry().clone());

    // === 4. Command handler with backup mirror ===
    let mirror = BackupMirror::new(config.backup_path.clone());
    let handler = ActionCommandHandler::new(store, mirror, metrics.clone());
    let state = web::Data::new(api::AppState::new(handler, metrics));

    // === 5. HTTP servers ===
    tracing::info!("🚀 Serving actions API on http://{}/api/actions/", config.bind_addr);
    let api_server = HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind(config.bind_addr)?
        .run();

    tokio::try_join!(
        api_server,
        metrics::start_metrics_server(metrics_registry, config.metrics_addr())
    )?;

    tracing::info!("Shutdown complete");
    Ok(())
}
