//! # ScoutsTribe API Server
//!
//! Backend for the ScoutsTribe web client: grade-based messaging channels,
//! member roster and yearly grade advancement, event attendance tracking,
//! and user role management.
//!
//! ## Usage
//!
//! ```bash
//! API_PORT=3001 LOG_FORMAT=json cargo run -p scoutstribe-api
//! ```

use scoutstribe_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use scoutstribe_shared::store::MemoryStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log.format);

    tracing::info!(
        "ScoutsTribe API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let store = if config.store.seed_default_users {
        MemoryStore::seeded()?
    } else {
        tracing::warn!("Starting without default accounts; only self-signup is available");
        MemoryStore::new()
    };

    let address = config.bind_address();
    let state = AppState::new(Arc::new(store), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scoutstribe_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    tracing::info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("Received Ctrl+C, shutting down...");
    }
}
