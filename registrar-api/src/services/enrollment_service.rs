//! Enrollment Service
//!
//! Cache-aside orchestration for enrollment records:
//! - reads try the cache first and populate it on a miss
//! - create and list go to the record store only
//! - update and delete write the store first, then invalidate the entry
//!
//! Cache failures never leave this module. They are logged and counted by
//! [`EnrollmentCache`] and show up here only as a metric label.

use std::sync::Arc;

use chrono::Utc;
use registrar_core::{
    new_enrollment_id, CacheError, Enrollment, EnrollmentDraft, RegistrarResult, StorageError,
};
use registrar_storage::{CacheLookup, CacheRead, EnrollmentCache, EnrollmentStore};
use tracing::{debug, info};

use crate::telemetry::metrics;

/// Coordinates the record store and the cache for every enrollment request.
pub struct EnrollmentService {
    store: Arc<dyn EnrollmentStore>,
    cache: Arc<EnrollmentCache>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn EnrollmentStore>, cache: Arc<EnrollmentCache>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &EnrollmentCache {
        &self.cache
    }

    /// Readiness of the record store.
    pub fn check_store(&self) -> RegistrarResult<()> {
        Ok(self.store.ping()?)
    }

    /// Persist a new enrollment built from `draft`. Never touches the cache.
    pub fn create(&self, draft: EnrollmentDraft) -> RegistrarResult<Enrollment> {
        let enrollment = Enrollment::from_draft(new_enrollment_id(), draft, Utc::now());

        let result = self.store.create(&enrollment);
        record_store_operation("create", &result);
        result?;

        info!(
            enrollment_id = %enrollment.id,
            student_id = %enrollment.student_id,
            course_id = %enrollment.course_id,
            "Created enrollment"
        );
        Ok(enrollment)
    }

    /// Every stored enrollment, straight from the store.
    pub fn list(&self) -> RegistrarResult<Vec<Enrollment>> {
        let result = self.store.list_all();
        record_store_operation("list", &result);
        Ok(result?)
    }

    /// Read one enrollment through the cache.
    ///
    /// A hit is returned without consulting the store. A miss or a degraded
    /// cache falls through to the store; a found record is written back and
    /// a missing one is not cached.
    pub async fn get(&self, id: &str) -> RegistrarResult<CacheRead<Enrollment>> {
        match self.cache.get(id).await {
            CacheLookup::Hit(enrollment) => {
                record_cache_operation("get", "hit");
                return Ok(CacheRead::from_cache(enrollment));
            }
            CacheLookup::Miss => record_cache_operation("get", "miss"),
            CacheLookup::Degraded(e) => record_cache_operation("get", e.kind()),
        }

        let result = self.store.get_by_id(id);
        record_store_operation("get", &result);
        let enrollment = result?;

        let populated = self.cache.set(&enrollment).await;
        record_cache_write("set", &populated);

        Ok(CacheRead::from_store(enrollment))
    }

    /// Replace an enrollment in full, then invalidate its cache entry.
    ///
    /// `id` and `created_at` are kept from the stored record, as is the
    /// enrollment date when `draft` has none. On any store failure the cache
    /// is left alone.
    pub async fn update(&self, id: &str, draft: EnrollmentDraft) -> RegistrarResult<Enrollment> {
        let current = self.store.get_by_id(id);
        record_store_operation("get", &current);
        let replacement = current?.replaced_by(draft, Utc::now());

        let result = self.store.update(id, &replacement);
        record_store_operation("update", &result);
        result?;

        let invalidated = self.cache.delete(id).await;
        record_cache_write("invalidate", &invalidated);

        info!(enrollment_id = %id, status = %replacement.status, "Updated enrollment");
        Ok(replacement)
    }

    /// Delete an enrollment, then invalidate its cache entry.
    pub async fn delete(&self, id: &str) -> RegistrarResult<()> {
        let result = self.store.delete(id);
        record_store_operation("delete", &result);
        result?;

        let invalidated = self.cache.delete(id).await;
        record_cache_write("invalidate", &invalidated);

        info!(enrollment_id = %id, "Deleted enrollment");
        Ok(())
    }
}

fn record_store_operation<T>(operation: &'static str, result: &Result<T, StorageError>) {
    let status = match result {
        Ok(_) => "success",
        Err(StorageError::NotFound { .. }) => "not_found",
        Err(StorageError::AlreadyExists { .. }) => "conflict",
        Err(StorageError::LockPoisoned) => "error",
    };
    if let Err(e) = result {
        debug!(operation, error = %e, "Store operation failed");
    }
    if let Some(metrics) = metrics() {
        metrics.record_store_operation(operation, status);
    }
}

fn record_cache_operation(operation: &'static str, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics.record_cache_operation(operation, outcome);
    }
}

fn record_cache_write(operation: &'static str, result: &Result<(), CacheError>) {
    let outcome = match result {
        Ok(()) => "ok",
        Err(e) => e.kind(),
    };
    record_cache_operation(operation, outcome);
}
