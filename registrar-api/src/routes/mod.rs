//! REST API Routes
//!
//! Route modules and the router assembly for the Registrar API.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

pub mod cache;
pub mod enrollment;
pub mod health;

// ============================================================================
// SERVICE ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// GET / - Plain-text banner naming the service and cache mode.
async fn root(State(state): State<AppState>) -> String {
    let mode = if state.cache.is_enabled() {
        "enabled"
    } else {
        "disabled"
    };
    format!(
        "Registrar enrollment API v{} - Cache: {} ({})",
        env!("CARGO_PKG_VERSION"),
        mode,
        state.cache.backend_name()
    )
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(enrollment::CACHE_STATUS_HEADER)])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            origins = ?config.cors_origins,
            "CORS: Production mode - allowing configured origins"
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - Enrollment CRUD under /api/enrollments
/// - Health checks at /health and /health/*
/// - Cache statistics at /cache/stats
/// - Metrics at /metrics
/// - OpenAPI spec at /openapi.json
///
/// Execution order: CORS -> Observability -> Handler
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let cors = build_cors_layer(config);

    Router::new()
        .route("/", get(root))
        .merge(enrollment::create_router())
        .merge(health::create_router())
        .merge(cache::create_router())
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(from_fn(observability_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_builds_in_both_modes() {
        let mut config = ApiConfig::default();
        let _dev = build_cors_layer(&config);
        config.cors_origins = vec!["https://registrar.example".to_string()];
        let _prod = build_cors_layer(&config);
    }

    #[test]
    fn test_openapi_document_lists_enrollment_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/enrollments"));
        assert!(doc.paths.paths.contains_key("/api/enrollments/{id}"));
    }

    #[test]
    fn test_openapi_document_types_timestamps() -> Result<(), serde_json::Error> {
        let doc = serde_json::to_value(ApiDoc::openapi())?;
        let schemas = &doc["components"]["schemas"];
        assert_eq!(
            schemas["Enrollment"]["properties"]["created_at"]["format"],
            "date-time"
        );
        assert_eq!(
            schemas["EnrollmentRequest"]["properties"]["enrollment_date"]["format"],
            "date-time"
        );
        Ok(())
    }
}
