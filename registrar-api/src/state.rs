//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use registrar_storage::{
    CacheBackend, EnrollmentCache, EnrollmentStore, InMemoryCacheBackend, NullCacheBackend,
    RedisCacheBackend,
};

use crate::config::{CacheBackendKind, CacheSettings};
use crate::services::EnrollmentService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside orchestrator used by the enrollment routes.
    pub enrollments: Arc<EnrollmentService>,
    /// Shared with `enrollments`; exposed for health and stats routes.
    pub cache: Arc<EnrollmentCache>,
    pub start_time: Instant,
    pub environment: String,
}

impl AppState {
    /// Wire a store and cache into fresh application state.
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        cache: Arc<EnrollmentCache>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            enrollments: Arc::new(EnrollmentService::new(store, Arc::clone(&cache))),
            cache,
            start_time: Instant::now(),
            environment: environment.into(),
        }
    }
}

crate::impl_from_ref!(Arc<EnrollmentService>, enrollments);
crate::impl_from_ref!(Arc<EnrollmentCache>, cache);
crate::impl_from_ref!(Instant, start_time);

/// Build the cache backend named by `settings`.
///
/// An unreachable Redis is not fatal: the service starts with caching
/// disabled and every read goes to the store.
pub async fn connect_cache_backend(settings: &CacheSettings) -> Arc<dyn CacheBackend> {
    match settings.backend {
        CacheBackendKind::Disabled => {
            tracing::info!("Cache disabled by configuration");
            Arc::new(NullCacheBackend)
        }
        CacheBackendKind::Memory => {
            tracing::info!("Using in-process cache backend");
            Arc::new(InMemoryCacheBackend::new())
        }
        CacheBackendKind::Redis => {
            match RedisCacheBackend::connect(&settings.redis_url, settings.timeout).await {
                Ok(backend) => {
                    tracing::info!(
                        timeout_ms = settings.timeout.as_millis() as u64,
                        "Connected to Redis cache"
                    );
                    Arc::new(backend)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Redis unreachable at startup, continuing without cache"
                    );
                    Arc::new(NullCacheBackend)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_disabled_backend() {
        let settings = CacheSettings {
            backend: CacheBackendKind::Disabled,
            ..CacheSettings::default()
        };
        let backend = connect_cache_backend(&settings).await;
        assert_eq!(backend.name(), "disabled");
        assert!(!backend.is_enabled());
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let settings = CacheSettings {
            backend: CacheBackendKind::Memory,
            ..CacheSettings::default()
        };
        assert_eq!(connect_cache_backend(&settings).await.name(), "memory");
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_disabled() {
        let settings = CacheSettings {
            backend: CacheBackendKind::Redis,
            redis_url: "redis://127.0.0.1:1".to_string(),
            timeout: Duration::from_millis(100),
        };
        let backend = connect_cache_backend(&settings).await;
        assert_eq!(backend.name(), "disabled");
    }
}
