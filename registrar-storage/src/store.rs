//! Authoritative enrollment record store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use registrar_core::{Enrollment, StorageError};

/// Storage trait for enrollment records.
///
/// Implementations must be safe to share between request tasks. Every
/// operation signals absence or collision through [`StorageError`]; returned
/// records are owned copies with no link back to the stored value.
pub trait EnrollmentStore: Send + Sync {
    /// Insert a new record. Fails with `AlreadyExists` if the id is taken.
    fn create(&self, enrollment: &Enrollment) -> Result<(), StorageError>;

    /// Get a record by id. Fails with `NotFound` if absent.
    fn get_by_id(&self, id: &str) -> Result<Enrollment, StorageError>;

    /// List every stored record, in no particular order.
    fn list_all(&self) -> Result<Vec<Enrollment>, StorageError>;

    /// Replace a record in full. The stored id always equals `id`.
    fn update(&self, id: &str, enrollment: &Enrollment) -> Result<(), StorageError>;

    /// Permanently remove a record. Fails with `NotFound` if absent.
    fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Readiness probe. Succeeds when the store can serve requests.
    fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// In-memory store guarded by a reader/writer lock.
///
/// Readers proceed concurrently; create/update/delete hold the write lock
/// for the whole check-and-mutate sequence.
#[derive(Debug, Default)]
pub struct InMemoryEnrollmentStore {
    enrollments: RwLock<HashMap<String, Enrollment>>,
}

impl InMemoryEnrollmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Enrollment>>, StorageError> {
        self.enrollments
            .read()
            .map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Enrollment>>, StorageError> {
        self.enrollments
            .write()
            .map_err(|_| StorageError::LockPoisoned)
    }
}

impl EnrollmentStore for InMemoryEnrollmentStore {
    fn create(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let mut enrollments = self.write()?;
        if enrollments.contains_key(&enrollment.id) {
            return Err(StorageError::already_exists(enrollment.id.as_str()));
        }
        enrollments.insert(enrollment.id.clone(), enrollment.clone());
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Enrollment, StorageError> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(id))
    }

    fn list_all(&self) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn update(&self, id: &str, enrollment: &Enrollment) -> Result<(), StorageError> {
        let mut enrollments = self.write()?;
        let stored = enrollments
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found(id))?;

        let mut replacement = enrollment.clone();
        replacement.id = id.to_string();
        *stored = replacement;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(id))
    }

    fn ping(&self) -> Result<(), StorageError> {
        self.read().map(|_| ())
    }
}
