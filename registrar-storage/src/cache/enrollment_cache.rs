//! Typed cache front for enrollment records.

use std::sync::Arc;
use std::time::{Duration, Instant};

use registrar_core::{CacheError, Enrollment};
use tracing::{debug, error, warn};

use super::lookup::CacheLookup;
use super::traits::{CacheBackend, CacheHealth, CacheStats, CacheStatsSnapshot};

/// Key namespace for enrollment snapshots.
pub const ENROLLMENT_CACHE_PREFIX: &str = "enrollment:";

/// Fixed lifetime of a cached snapshot.
pub const ENROLLMENT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache of JSON snapshots of enrollment records.
///
/// Wraps a [`CacheBackend`] trait object so the caller never checks whether
/// caching is on. All backend failures are logged and counted here; `get`
/// reports them as [`CacheLookup::Degraded`] and the write paths return
/// them only so callers can label metrics.
pub struct EnrollmentCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    stats: CacheStats,
}

impl std::fmt::Debug for EnrollmentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentCache")
            .field("backend", &self.backend.name())
            .field("ttl", &self.ttl)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl EnrollmentCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_ttl(backend, ENROLLMENT_CACHE_TTL)
    }

    /// Build with a non-default TTL. Only tests need this.
    pub fn with_ttl(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            stats: CacheStats::default(),
        }
    }

    /// Cache key for an enrollment id.
    pub fn key_for(id: &str) -> String {
        format!("{}{}", ENROLLMENT_CACHE_PREFIX, id)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_enabled()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a snapshot by enrollment id.
    pub async fn get(&self, id: &str) -> CacheLookup<Enrollment> {
        let key = Self::key_for(id);

        let bytes = match self.backend.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.stats.record_miss();
                debug!(key = %key, "Cache miss");
                return CacheLookup::Miss;
            }
            Err(e) => {
                self.stats.record_miss();
                self.stats.record_error();
                warn!(key = %key, backend = self.backend.name(), error = %e, "Cache read failed, falling back to store");
                return CacheLookup::Degraded(e);
            }
        };

        match serde_json::from_slice::<Enrollment>(&bytes) {
            Ok(enrollment) => {
                self.stats.record_hit();
                debug!(key = %key, "Cache hit");
                CacheLookup::Hit(enrollment)
            }
            Err(e) => {
                self.stats.record_miss();
                self.stats.record_error();
                warn!(key = %key, error = %e, "Undecodable cache entry, falling back to store");
                CacheLookup::Degraded(CacheError::Deserialization {
                    key,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Store a snapshot of `enrollment`, overwriting any previous entry.
    pub async fn set(&self, enrollment: &Enrollment) -> Result<(), CacheError> {
        let key = Self::key_for(&enrollment.id);

        let bytes = serde_json::to_vec(enrollment).map_err(|e| {
            self.stats.record_error();
            let err = CacheError::Serialization {
                key: key.clone(),
                reason: e.to_string(),
            };
            error!(key = %key, error = %err, "Failed to serialize enrollment for cache");
            err
        })?;

        match self.backend.set(&key, bytes, self.ttl).await {
            Ok(()) => {
                if self.backend.is_enabled() {
                    self.stats.record_set();
                    debug!(key = %key, ttl_secs = self.ttl.as_secs(), "Cached enrollment");
                }
                Ok(())
            }
            Err(e) => {
                self.stats.record_error();
                warn!(key = %key, backend = self.backend.name(), error = %e, "Cache write failed");
                Err(e)
            }
        }
    }

    /// Drop the snapshot for `id`. Dropping an absent entry succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), CacheError> {
        let key = Self::key_for(id);
        match self.backend.delete(&key).await {
            Ok(()) => {
                if self.backend.is_enabled() {
                    self.stats.record_invalidation();
                    debug!(key = %key, "Invalidated cache entry");
                }
                Ok(())
            }
            Err(e) => {
                self.stats.record_error();
                warn!(key = %key, backend = self.backend.name(), error = %e, "Cache invalidation failed");
                Err(e)
            }
        }
    }

    /// Probe the backend.
    pub async fn health_check(&self) -> CacheHealth {
        let started = Instant::now();
        let result = self.backend.ping().await;
        let latency_ms = started.elapsed().as_millis() as u64;

        CacheHealth {
            backend: self.backend.name(),
            enabled: self.backend.is_enabled(),
            reachable: result.is_ok(),
            latency_ms,
            error: result.err().map(|e| e.to_string()),
        }
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}
