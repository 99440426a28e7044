use std::sync::Arc;

use anyhow::Context;
use common::StaticCatalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database::{ensure_indexes, init_db};
use server::state::AppState;
use server::store::DbProgressStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let catalog = match &config.catalog.path {
        Some(path) => StaticCatalog::load(path)
            .await
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => StaticCatalog::builtin().context("Failed to load built-in catalog")?,
    };
    info!(problems = catalog.len(), "Problem catalog loaded");

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    ensure_indexes(&db).await?;

    info!(write_policy = ?config.progress.write_policy, "Progress tracking configured");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        progress: Arc::new(DbProgressStore::new(db.clone())),
        catalog: Arc::new(catalog),
        db,
        config,
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
