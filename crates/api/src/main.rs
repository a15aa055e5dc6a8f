mod config;
mod error;
mod middleware;
mod routes;
mod state;

use lumn_core::store::postgres::MIGRATOR;
use lumn_core::DocumentStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, StoreTarget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting Lümn Note API server");

    let store = connect_store(&config).await?;
    let state = state::AppState::new(store.clone(), config.clone());

    let app = routes::app(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Open the document store selected by `DATABASE_URL`. A configured database
/// that cannot be reached is fatal; an absent one is not.
async fn connect_store(config: &AppConfig) -> anyhow::Result<DocumentStore> {
    let store = match config.store_target() {
        StoreTarget::Postgres(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .min_connections(config.db_min_connections)
                .acquire_timeout(config.store_timeout)
                .connect(&url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
            tracing::info!("Connected to PostgreSQL");

            MIGRATOR
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;
            tracing::info!("Database migrations applied");

            DocumentStore::postgres(pool)
        }
        StoreTarget::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on exit");
            DocumentStore::memory()
        }
        StoreTarget::None => {
            tracing::warn!("DATABASE_URL not set; running without a document store");
            DocumentStore::disconnected()
        }
    };
    Ok(store.with_timeout(config.store_timeout))
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
