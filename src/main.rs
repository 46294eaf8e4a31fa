use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mars_middle::gateway::Gateway;
use mars_middle::mars::MarsClient;
use mars_middle::store::FileStore;
use mars_middle::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up STORE_PATH, JWT secret, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = mars_middle::config::config();
    tracing::info!("starting mars-middle in {:?} mode", config.environment);

    let store = FileStore::open(&config.store.path, &config.store.default_admin_password)
        .await
        .with_context(|| format!("failed to open store at {}", config.store.path))?;

    let client = MarsClient::new(&config.remote).context("failed to build remote client")?;
    let state = AppState::new(Arc::new(store), Gateway::new(client));

    let app = mars_middle::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on http://{bind_addr}");
    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
