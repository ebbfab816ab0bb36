//! In-process cache backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use registrar_core::CacheError;
use tracing::debug;

use super::traits::CacheBackend;

#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// How often writes sweep out expired entries by default.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Sharded concurrent map with per-entry expiry.
///
/// Expired entries are dropped lazily when read. Writes also sweep the whole
/// map at most once per sweep interval, so keys that are never read again
/// are still reclaimed. Used for single-node deployments without Redis and
/// as the backend in tests.
#[derive(Debug)]
pub struct InMemoryCacheBackend {
    entries: DashMap<String, Entry>,
    started: Instant,
    sweep_interval: Duration,
    /// Milliseconds after `started` at which the next write sweeps.
    next_sweep_ms: AtomicU64,
}

impl Default for InMemoryCacheBackend {
    fn default() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            started: Instant::now(),
            sweep_interval,
            next_sweep_ms: AtomicU64::new(sweep_interval.as_millis() as u64),
        }
    }

    /// Number of entries held, including any not yet purged after expiry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Sweep if the interval has elapsed. Only one concurrent caller wins.
    fn maybe_sweep(&self) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        let due = self.next_sweep_ms.load(Ordering::Relaxed);
        if elapsed_ms < due {
            return;
        }
        let next = elapsed_ms + self.sweep_interval.as_millis() as u64;
        if self
            .next_sweep_ms
            .compare_exchange(due, next, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            let removed = self.purge_expired();
            if removed > 0 {
                debug!(removed, remaining = self.entries.len(), "Swept expired cache entries");
            }
        }
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.bytes.clone()));
            }
        }
        // Re-check under the shard lock so a fresh concurrent write survives.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.maybe_sweep();
        self.entries.insert(
            key.to_string(),
            Entry {
                bytes: value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
