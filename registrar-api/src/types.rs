//! Request and response bodies for the enrollment API.

use registrar_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Body of create and full-update requests.
///
/// Missing string fields decode as empty so validation can name the field;
/// wrongly-typed fields fail decoding outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EnrollmentRequest {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub course_id: String,
    /// One of `pending`, `active`, `completed`.
    #[serde(default)]
    pub status: String,
    /// Defaults to the creation time on create; kept as-is on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub enrollment_date: Option<Timestamp>,
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Enrollment deleted successfully".to_string(),
        }
    }
}

/// Cache usage counters plus backend reachability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CacheStatsResponse {
    pub backend: String,
    pub enabled: bool,
    pub reachable: bool,
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
    pub sets: u64,
    pub invalidations: u64,
    /// Hits over lookups, 0.0 to 1.0.
    pub hit_rate: f64,
    pub ttl_seconds: u64,
}
