// Dashboard server binary entry point

#[path = "server/config.rs"]
mod config;
#[path = "server/error.rs"]
mod error;
#[path = "server/handlers/mod.rs"]
mod handlers;
#[path = "server/routes.rs"]
mod routes;
#[path = "server/simulator.rs"]
mod simulator;


use std::sync::Arc;
use tracing::info;

use config::ServerConfig;
use health_dashboard::store::ReadingStore;
use health_dashboard::time::SystemClock;
use routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Arc::new(ServerConfig::from_env()?);

    info!(bind_addr = %config.bind_addr, "Health dashboard server starting");

    // The single store instance for the process lifetime, shared explicitly
    let store = Arc::new(ReadingStore::new(Arc::new(SystemClock::new())));

    if config.simulator.enabled {
        simulator::spawn(store.clone(), config.simulator.clone());
    }

    let state = AppState::new(store, config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
