//! Cache backend trait and usage statistics.
//!
//! Backends deal in raw bytes keyed by strings. Typing, key layout and
//! serialization live one level up in [`super::EnrollmentCache`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use registrar_core::CacheError;
use serde::Serialize;

/// Cache backend trait for pluggable cache implementations.
///
/// This trait abstracts over Redis, an in-process map and a disabled
/// backend. Implementations must be thread-safe and support concurrent
/// access. A backend never raises past its own boundary in a way that
/// should fail a request; callers treat every `Err` as "cache unavailable".
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name for logs and health reports.
    fn name(&self) -> &'static str;

    /// Whether this backend actually stores anything.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Get raw bytes for a key. `Ok(None)` means the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store raw bytes under a key with a time-to-live.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Reachability probe.
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Lock-free counters describing cache usage since startup.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
    sets: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses, including degraded lookups.
    pub misses: u64,
    /// Number of backend or codec failures.
    pub errors: u64,
    /// Number of successful writes.
    pub sets: u64,
    /// Number of successful invalidations.
    pub invalidations: u64,
}

impl CacheStatsSnapshot {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Result of a cache health probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheHealth {
    pub backend: &'static str,
    pub enabled: bool,
    pub reachable: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
