use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autos_api::config::StoreBackend;
use autos_api::state::AppState;

/// Vehicle and brand inventory API
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to bind (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides AUTOS_API_PORT / PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// Storage backend (overrides AUTOS_STORE)
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_USERS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autos_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = autos_api::config::config().clone();
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(store) = args.store {
        config.store = store;
    }
    tracing::info!("Starting Autos API in {:?} mode with {:?} store", config.environment, config.store);

    if config.security.users.is_empty() {
        tracing::warn!("No users configured (AUTH_USERS); every protected route will answer 401");
    }

    let gateway = autos_api::gateway_from_config(&config).context("failed to configure store")?;
    let state = AppState::new(gateway, config.security.clone());
    let app = autos_api::app(state, &config);

    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Autos API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Autos API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
