//! # CrewTask API Server
//!
//! This is the main API server for CrewTask, a small collaboration backend
//! for projects, tasks and task assignments.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Account and session endpoints (opaque bearer tokens, argon2 hashes)
//! - Project and task CRUD with per-owner and per-assignee permission checks
//! - A user directory with prefix search, collaborators and presence
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p crewtask-api
//! ```

use crewtask_api::{
    app::{build_router, AppState},
    config::Config,
};
use crewtask_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crewtask_api=debug,crewtask_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "CrewTask API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
