//! Cache-aside layer for enrollment records.
//!
//! The cache holds full JSON snapshots under `enrollment:<id>` for a fixed
//! TTL. It is disposable: clearing it loses no data, and an unreachable
//! backend degrades each call to a miss instead of failing the request.
//!
//! # Backends
//!
//! - [`RedisCacheBackend`]: shared cache for production deployments
//! - [`InMemoryCacheBackend`]: process-local, for development and tests
//! - [`NullCacheBackend`]: caching disabled
//!
//! # Example
//!
//! ```ignore
//! let cache = EnrollmentCache::new(Arc::new(InMemoryCacheBackend::new()));
//! match cache.get(&id).await {
//!     CacheLookup::Hit(enrollment) => CacheRead::from_cache(enrollment),
//!     CacheLookup::Miss | CacheLookup::Degraded(_) => {
//!         let enrollment = store.get_by_id(&id)?;
//!         let _ = cache.set(&enrollment).await;
//!         CacheRead::from_store(enrollment)
//!     }
//! }
//! ```

pub mod enrollment_cache;
pub mod lookup;
pub mod memory_backend;
pub mod null_backend;
pub mod redis_backend;
pub mod traits;

pub use enrollment_cache::{EnrollmentCache, ENROLLMENT_CACHE_PREFIX, ENROLLMENT_CACHE_TTL};
pub use lookup::{CacheLookup, CacheRead, CacheStatus};
pub use memory_backend::InMemoryCacheBackend;
pub use null_backend::NullCacheBackend;
pub use redis_backend::RedisCacheBackend;
pub use traits::{CacheBackend, CacheHealth, CacheStats, CacheStatsSnapshot};
