//! Registrar Core - Entity Types
//!
//! Pure data structures shared by the store, the cache layer and the API.
//! This crate contains ONLY data types and their invariants - no I/O.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod entities;
pub mod enums;
pub mod error;

pub use entities::{Enrollment, EnrollmentDraft};
pub use enums::EnrollmentStatus;
pub use error::{
    CacheError, ConfigError, RegistrarError, RegistrarResult, StorageError, ValidationError,
};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Opaque enrollment identifier.
///
/// Generated ids are UUIDv7 strings, but the store and cache treat the value
/// as an arbitrary key.
pub type EnrollmentId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new enrollment id (timestamp-sortable UUIDv7 string).
pub fn new_enrollment_id() -> EnrollmentId {
    Uuid::now_v7().to_string()
}
