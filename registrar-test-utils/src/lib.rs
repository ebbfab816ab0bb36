//! Registrar Test Utilities
//!
//! Shared test infrastructure for the Registrar workspace:
//! - Proptest generators for enrollment inputs
//! - Instrumented and failing backends for exercising the cache-aside paths
//! - Test fixtures for common scenarios
//! - Custom assertions for Registrar error variants

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

// Re-export core types for convenience
pub use registrar_core::{
    CacheError, Enrollment, EnrollmentDraft, EnrollmentStatus, RegistrarError, RegistrarResult,
    StorageError, Timestamp, ValidationError,
};
pub use registrar_storage::{
    CacheBackend, EnrollmentCache, EnrollmentStore, InMemoryCacheBackend, InMemoryEnrollmentStore,
};

// ============================================================================
// TEST BACKENDS
// ============================================================================

/// Cache backend whose every call fails the way an unreachable Redis does.
#[derive(Debug, Clone, Default)]
pub struct FailingCacheBackend;

impl FailingCacheBackend {
    fn refused(operation: &'static str) -> CacheError {
        CacheError::Transport {
            operation,
            reason: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl CacheBackend for FailingCacheBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(Self::refused("get"))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(Self::refused("set"))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(Self::refused("delete"))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable {
            reason: "connection refused".to_string(),
        })
    }
}

/// In-memory cache backend that counts calls per operation.
#[derive(Debug, Default)]
pub struct CountingCacheBackend {
    inner: InMemoryCacheBackend,
    gets: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
}

impl CountingCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Total backend calls of any kind.
    pub fn calls(&self) -> u64 {
        self.gets() + self.sets() + self.deletes()
    }

    /// Whether a live entry exists under `key`, without counting the probe.
    pub async fn contains(&self, key: &str) -> bool {
        matches!(self.inner.get(key).await, Ok(Some(_)))
    }
}

#[async_trait]
impl CacheBackend for CountingCacheBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::Relaxed);
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.inner.delete(key).await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.inner.ping().await
    }
}

/// In-memory store that counts point reads.
///
/// Lets tests prove a cache hit never reached the store.
#[derive(Debug, Default)]
pub struct CountingEnrollmentStore {
    inner: InMemoryEnrollmentStore,
    reads: AtomicU64,
}

impl CountingEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_by_id` calls so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl EnrollmentStore for CountingEnrollmentStore {
    fn create(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        self.inner.create(enrollment)
    }

    fn get_by_id(&self, id: &str) -> Result<Enrollment, StorageError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.inner.get_by_id(id)
    }

    fn list_all(&self) -> Result<Vec<Enrollment>, StorageError> {
        self.inner.list_all()
    }

    fn update(&self, id: &str, enrollment: &Enrollment) -> Result<(), StorageError> {
        self.inner.update(id, enrollment)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.inner.delete(id)
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for enrollment inputs.

    use super::*;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    /// Any valid enrollment status.
    pub fn arb_status() -> impl Strategy<Value = EnrollmentStatus> {
        prop::sample::select(EnrollmentStatus::ALL.to_vec())
    }

    /// Timestamps between 2020 and 2030, whole seconds.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64)
            .prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now))
    }

    /// A non-blank identifier-like field value.
    pub fn arb_field_value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9_-]{0,23}"
    }

    /// A value that fails the required-field check.
    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t]{0,4}"
    }

    /// A status string outside the accepted set.
    pub fn arb_unknown_status() -> impl Strategy<Value = String> {
        "[a-z]{1,12}".prop_filter("must not be a known status", |s| {
            s.parse::<EnrollmentStatus>().is_err()
        })
    }

    /// A valid draft, with or without an explicit enrollment date.
    pub fn arb_draft() -> impl Strategy<Value = EnrollmentDraft> {
        (
            arb_field_value(),
            arb_field_value(),
            arb_status(),
            prop::option::of(arb_timestamp()),
        )
            .prop_map(|(student_id, course_id, status, enrollment_date)| EnrollmentDraft {
                student_id,
                course_id,
                status,
                enrollment_date,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;
    use chrono::Utc;

    /// A pending draft for student `s1` in course `c1`.
    pub fn pending_draft() -> EnrollmentDraft {
        draft_with_status(EnrollmentStatus::Pending)
    }

    pub fn draft_with_status(status: EnrollmentStatus) -> EnrollmentDraft {
        EnrollmentDraft {
            student_id: "s1".to_string(),
            course_id: "c1".to_string(),
            status,
            enrollment_date: None,
        }
    }

    /// A freshly created pending enrollment with the given id.
    pub fn make_enrollment(id: &str) -> Enrollment {
        Enrollment::from_draft(id.to_string(), pending_draft(), Utc::now())
    }

    /// Cache over a process-local backend.
    pub fn memory_cache() -> Arc<EnrollmentCache> {
        Arc::new(EnrollmentCache::new(Arc::new(InMemoryCacheBackend::new())))
    }

    /// Cache whose backend rejects every call.
    pub fn failing_cache() -> Arc<EnrollmentCache> {
        Arc::new(EnrollmentCache::new(Arc::new(FailingCacheBackend)))
    }

    /// Cache over a counting backend, returning both handles.
    pub fn counting_cache() -> (Arc<EnrollmentCache>, Arc<CountingCacheBackend>) {
        let backend = Arc::new(CountingCacheBackend::new());
        let cache = Arc::new(EnrollmentCache::new(backend.clone()));
        (cache, backend)
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for Registrar error variants.

    use super::*;

    /// Assert that a RegistrarResult is a NotFound storage error.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &RegistrarResult<T>) {
        match result {
            Err(RegistrarError::Storage(StorageError::NotFound { .. })) => {}
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    /// Assert that a RegistrarResult is a Validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &RegistrarResult<T>) {
        match result {
            Err(RegistrarError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert the record-level invariants every stored enrollment keeps.
    #[track_caller]
    pub fn assert_timestamps_ordered(enrollment: &Enrollment) {
        assert!(
            enrollment.updated_at >= enrollment.created_at,
            "updated_at {} precedes created_at {}",
            enrollment.updated_at,
            enrollment.created_at
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_failing_backend_fails_everything() {
        let backend = FailingCacheBackend;
        assert!(backend.get("k").await.is_err());
        assert!(backend.set("k", vec![1], Duration::from_secs(1)).await.is_err());
        assert!(backend.delete("k").await.is_err());
        assert!(backend.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_counting_backend_counts() -> Result<(), CacheError> {
        let backend = CountingCacheBackend::new();
        backend.set("k", vec![1], Duration::from_secs(60)).await?;
        assert_eq!(backend.get("k").await?, Some(vec![1]));
        backend.delete("k").await?;
        assert!(!backend.contains("k").await);

        assert_eq!(backend.sets(), 1);
        assert_eq!(backend.gets(), 1);
        assert_eq!(backend.deletes(), 1);
        assert_eq!(backend.calls(), 3);
        Ok(())
    }

    #[test]
    fn test_counting_store_counts_point_reads() -> Result<(), StorageError> {
        let store = CountingEnrollmentStore::new();
        let e = fixtures::make_enrollment("1");
        store.create(&e)?;
        assert_eq!(store.get_by_id("1")?, e);
        assert!(store.get_by_id("2").is_err());
        store.list_all()?;
        assert_eq!(store.reads(), 2);
        Ok(())
    }

    #[test]
    fn test_fixture_timestamps() {
        let e = fixtures::make_enrollment("1");
        assertions::assert_timestamps_ordered(&e);
        assert_eq!(e.created_at, e.updated_at);
        assert_eq!(e.status, EnrollmentStatus::Pending);
    }

    proptest! {
        #[test]
        fn prop_generated_fields_are_non_blank(value in generators::arb_field_value()) {
            prop_assert!(!value.trim().is_empty());
        }

        #[test]
        fn prop_unknown_status_never_parses(raw in generators::arb_unknown_status()) {
            prop_assert!(raw.parse::<EnrollmentStatus>().is_err());
        }
    }
}
