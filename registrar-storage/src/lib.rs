//! Registrar Storage - Record Store and Cache Layer
//!
//! The record store is the source of truth for enrollments. The cache layer
//! fronts it with TTL-bounded JSON snapshots and is never a hard dependency:
//! every backend failure degrades to a miss.

pub mod cache;
pub mod store;

pub use cache::{
    CacheBackend, CacheHealth, CacheLookup, CacheRead, CacheStats, CacheStatsSnapshot,
    CacheStatus, EnrollmentCache, InMemoryCacheBackend, NullCacheBackend, RedisCacheBackend,
    ENROLLMENT_CACHE_PREFIX, ENROLLMENT_CACHE_TTL,
};
pub use store::{EnrollmentStore, InMemoryEnrollmentStore};
