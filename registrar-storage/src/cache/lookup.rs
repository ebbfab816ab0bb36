//! Outcome types for cache-aside reads.
//!
//! A lookup never fails outright: a broken backend shows up as
//! [`CacheLookup::Degraded`] and the caller treats it like a miss. Once the
//! read is resolved, [`CacheRead`] carries the value together with where it
//! came from so the HTTP layer can report it.

use std::fmt;

use registrar_core::CacheError;

/// Result of asking the cache for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    /// The cache held a decodable value.
    Hit(T),
    /// The key is absent or expired.
    Miss,
    /// The backend or decoder failed; treat as a miss.
    Degraded(CacheError),
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Collapse into an `Option`, folding `Degraded` into `None`.
    pub fn into_hit(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Degraded(_) => None,
        }
    }
}

/// Where a read was ultimately served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value reported in the `X-Cache-Status` response header.
    pub fn as_header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_header_value())
    }
}

/// A resolved read together with its cache status.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    value: T,
    status: CacheStatus,
}

impl<T> CacheRead<T> {
    /// Create a read served from the cache.
    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            status: CacheStatus::Hit,
        }
    }

    /// Create a read served from the record store.
    pub fn from_store(value: T) -> Self {
        Self {
            value,
            status: CacheStatus::Miss,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    pub fn was_cache_hit(&self) -> bool {
        self.status == CacheStatus::Hit
    }

    /// Split into value and status.
    pub fn into_parts(self) -> (T, CacheStatus) {
        (self.value, self.status)
    }
}
