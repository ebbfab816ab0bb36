//! Registrar API Server Entry Point
//!
//! Bootstraps configuration, wires the record store and cache, and starts
//! the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use registrar_api::telemetry::{init_tracing, TelemetryConfig};
use registrar_api::{connect_cache_backend, create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use registrar_storage::{EnrollmentCache, InMemoryEnrollmentStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env()?;

    let backend = connect_cache_backend(&api_config.cache).await;
    let cache = Arc::new(EnrollmentCache::new(backend));

    let health = cache.health_check().await;
    tracing::info!(
        backend = health.backend,
        enabled = health.enabled,
        reachable = health.reachable,
        latency_ms = health.latency_ms,
        ttl_secs = cache.ttl().as_secs(),
        "Cache ready"
    );

    let store = Arc::new(InMemoryEnrollmentStore::new());
    let state = AppState::new(store, cache, api_config.environment.clone());

    let app: Router = create_api_router(state, &api_config);

    let addr = api_config.socket_addr()?;
    tracing::info!(%addr, "Starting Registrar API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
