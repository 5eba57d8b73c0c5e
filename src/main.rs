use leadership_records::config;
use leadership_records::relay::{self, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up FTP_HOST, FTP_PASSWORD, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting upload relay in {:?} mode", config.environment);

    let state = AppState::from_config(config);
    tracing::info!(
        "Transfer backend: {} (remote dir {})",
        state.connector.name(),
        state.remote_dir
    );
    let app = relay::app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.relay.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Upload relay listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
