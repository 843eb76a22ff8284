use std::sync::Arc;

use anyhow::{Context, Result};
use catalog::{config::AppConfig, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env()?;

    // invalid registry (duplicate ids, unsafe paths) aborts here
    let state = Arc::new(AppState::from_config(cfg.clone())?);
    info!(static_root = %cfg.static_root.display(), "static assets: ok");

    let app = catalog::router(state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("catalog listening on http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
