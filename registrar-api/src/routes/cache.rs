//! Cache diagnostics.

use axum::{extract::State, routing::get, Json, Router};
use registrar_storage::EnrollmentCache;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::CacheStatsResponse;

/// GET /cache/stats - Cache counters and reachability
#[utoipa::path(
    get,
    path = "/cache/stats",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache statistics", body = CacheStatsResponse),
    ),
)]
pub async fn cache_stats(State(cache): State<Arc<EnrollmentCache>>) -> Json<CacheStatsResponse> {
    let stats = cache.stats();
    let health = cache.health_check().await;

    Json(CacheStatsResponse {
        backend: health.backend.to_string(),
        enabled: health.enabled,
        reachable: health.reachable,
        hits: stats.hits,
        misses: stats.misses,
        errors: stats.errors,
        sets: stats.sets,
        invalidations: stats.invalidations,
        hit_rate: stats.hit_rate(),
        ttl_seconds: cache.ttl().as_secs(),
    })
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/cache/stats", get(cache_stats))
}
