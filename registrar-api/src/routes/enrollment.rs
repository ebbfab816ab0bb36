//! Enrollment REST API Routes
//!
//! CRUD over `/api/enrollments`. Reads by id go through the cache and report
//! where they were served from in the `X-Cache-Status` header.

use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use registrar_core::{Enrollment, EnrollmentDraft};
use registrar_storage::CacheStatus;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::extractors::JsonBody;
use crate::services::EnrollmentService;
use crate::state::AppState;
use crate::types::{DeleteResponse, EnrollmentRequest};

/// Response header carrying `HIT` or `MISS` on reads by id.
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";

fn cache_status_header(status: CacheStatus) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(status.as_header_value()),
    )
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// Create a new enrollment.
#[utoipa::path(
    post,
    path = "/api/enrollments",
    tag = "Enrollments",
    request_body = EnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = Enrollment),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Enrollment already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
)]
pub async fn create_enrollment(
    State(service): State<Arc<EnrollmentService>>,
    JsonBody(req): JsonBody<EnrollmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let draft = EnrollmentDraft::try_from(req)?;
    let enrollment = service.create(draft)?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// List all enrollments.
#[utoipa::path(
    get,
    path = "/api/enrollments",
    tag = "Enrollments",
    responses(
        (status = 200, description = "All enrollments", body = Vec<Enrollment>),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
)]
pub async fn list_enrollments(
    State(service): State<Arc<EnrollmentService>>,
) -> ApiResult<Json<Vec<Enrollment>>> {
    Ok(Json(service.list()?))
}

/// Get an enrollment by id, through the cache.
#[utoipa::path(
    get,
    path = "/api/enrollments/{id}",
    tag = "Enrollments",
    params(
        ("id" = String, Path, description = "Enrollment id")
    ),
    responses(
        (status = 200, description = "Enrollment found", body = Enrollment,
            headers(("x-cache-status" = String, description = "HIT or MISS"))),
        (status = 404, description = "Enrollment not found", body = ErrorBody,
            headers(("x-cache-status" = String, description = "Always MISS"))),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
)]
pub async fn get_enrollment(
    State(service): State<Arc<EnrollmentService>>,
    Path(id): Path<String>,
) -> Response {
    match service.get(&id).await {
        Ok(read) => {
            let (enrollment, status) = read.into_parts();
            ([cache_status_header(status)], Json(enrollment)).into_response()
        }
        Err(e) => {
            ([cache_status_header(CacheStatus::Miss)], ApiError::from(e)).into_response()
        }
    }
}

/// Replace an enrollment in full.
#[utoipa::path(
    put,
    path = "/api/enrollments/{id}",
    tag = "Enrollments",
    params(
        ("id" = String, Path, description = "Enrollment id")
    ),
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment updated", body = Enrollment),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Enrollment not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
)]
pub async fn update_enrollment(
    State(service): State<Arc<EnrollmentService>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<EnrollmentRequest>,
) -> ApiResult<Json<Enrollment>> {
    let draft = EnrollmentDraft::try_from(req)?;
    let enrollment = service.update(&id, draft).await?;
    Ok(Json(enrollment))
}

/// Delete an enrollment.
#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    tag = "Enrollments",
    params(
        ("id" = String, Path, description = "Enrollment id")
    ),
    responses(
        (status = 200, description = "Enrollment deleted", body = DeleteResponse),
        (status = 404, description = "Enrollment not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
)]
pub async fn delete_enrollment(
    State(service): State<Arc<EnrollmentService>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    service.delete(&id).await?;
    Ok(Json(DeleteResponse::deleted()))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the enrollment router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/enrollments",
            get(list_enrollments).post(create_enrollment),
        )
        .route(
            "/api/enrollments/:id",
            get(get_enrollment)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
}
