//! # mrl-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the MRL compliance API.
//! Binds to configurable port (default 8080).

use std::sync::Arc;

use mrl_api::state::{AppConfig, AppState};
use mrl_core::RecordStore;
use mrl_engine::{ComplianceChecker, EngineConfig};
use mrl_store::PostgrestStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let engine_config = EngineConfig::from_env().map_err(|e| {
        tracing::error!("Invalid engine configuration: {e}");
        e
    })?;

    let store: Arc<dyn RecordStore> = match &config.fixture {
        Some(path) => {
            let store = mrl_store::fixture::load_path(path).map_err(|e| {
                tracing::error!("Fixture loading failed: {e}");
                e
            })?;
            Arc::new(store)
        }
        None => {
            let store = PostgrestStore::from_env().map_err(|e| {
                tracing::error!("Record store not configured: {e}. Set MRL_STORE_URL and MRL_STORE_KEY, or MRL_FIXTURE.");
                e
            })?;
            tracing::info!("PostgREST record store configured");
            Arc::new(store)
        }
    };

    let checker = ComplianceChecker::new(store, engine_config);
    let port = config.port;
    let app = mrl_api::app(AppState::with_config(checker, config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("MRL compliance API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
