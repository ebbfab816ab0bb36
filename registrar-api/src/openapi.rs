//! OpenAPI Specification for Registrar API
//!
//! Generated with utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{cache, enrollment, health};
use crate::telemetry::metrics;
use crate::types::{CacheStatsResponse, DeleteResponse, EnrollmentRequest};

use registrar_core::{Enrollment, EnrollmentStatus};

/// OpenAPI document for Registrar API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Registrar API",
        description = "Student enrollment records with a cache-aside read path",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Enrollments", description = "Enrollment CRUD; reads by id report X-Cache-Status"),
        (name = "Health", description = "Liveness, readiness and component health"),
        (name = "Cache", description = "Cache diagnostics"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        enrollment::create_enrollment,
        enrollment::list_enrollments,
        enrollment::get_enrollment,
        enrollment::update_enrollment,
        enrollment::delete_enrollment,
        health::health,
        health::ping,
        health::liveness,
        health::readiness,
        cache::cache_stats,
        metrics::metrics_handler,
    ),
    components(schemas(
        Enrollment,
        EnrollmentStatus,
        EnrollmentRequest,
        DeleteResponse,
        ErrorBody,
        CacheStatsResponse,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
    ))
)]
pub struct ApiDoc;
