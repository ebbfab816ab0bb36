//! End-to-end tests for the enrollment routes.
//!
//! Drives the full router in-process and checks the cache-aside behavior
//! through the `X-Cache-Status` header and the backend call counters.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use registrar_storage::{EnrollmentCache, InMemoryEnrollmentStore, NullCacheBackend};
use registrar_test_utils::{fixtures, CountingEnrollmentStore};
use serde_json::{json, Value};

#[path = "support/app.rs"]
mod test_app_support;
use test_app_support::{build_app, create_enrollment, delete, get, post_json, put_json, send};

type TestResult = Result<(), String>;

fn timestamp(value: &Value, field: &str) -> Result<DateTime<Utc>, String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {}", field))?
        .parse::<DateTime<Utc>>()
        .map_err(|e| e.to_string())
}

// ============================================================================
// FULL LIFECYCLE
// ============================================================================

#[tokio::test]
async fn test_enrollment_lifecycle_through_cache() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());

    let created = post_json(
        &app,
        "/api/enrollments",
        json!({"student_id": "s1", "course_id": "c1", "status": "pending"}),
    )
    .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    let body = created.json()?;
    let id = body["id"].as_str().ok_or("no id")?.to_string();
    assert_eq!(body["status"], "pending");
    assert_eq!(timestamp(&body, "created_at")?, timestamp(&body, "updated_at")?);
    assert_eq!(timestamp(&body, "enrollment_date")?, timestamp(&body, "created_at")?);

    let uri = format!("/api/enrollments/{}", id);

    let first = get(&app, &uri).await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.cache_status(), Some("MISS"));

    let second = get(&app, &uri).await?;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.cache_status(), Some("HIT"));
    assert_eq!(first.json()?, second.json()?);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = put_json(
        &app,
        &uri,
        json!({"student_id": "s1", "course_id": "c1", "status": "active"}),
    )
    .await?;
    assert_eq!(updated.status, StatusCode::OK);
    let updated_body = updated.json()?;
    assert_eq!(updated_body["status"], "active");
    assert_eq!(updated_body["id"], body["id"]);
    assert_eq!(updated_body["created_at"], body["created_at"]);
    assert_eq!(updated_body["enrollment_date"], body["enrollment_date"]);
    assert!(timestamp(&updated_body, "updated_at")? > timestamp(&updated_body, "created_at")?);

    let after_update = get(&app, &uri).await?;
    assert_eq!(after_update.cache_status(), Some("MISS"));
    assert_eq!(after_update.json()?["status"], "active");

    let deleted = delete(&app, &uri).await?;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        deleted.json()?,
        json!({"message": "Enrollment deleted successfully"})
    );

    let gone = get(&app, &uri).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.cache_status(), Some("MISS"));
    assert_eq!(gone.error_message()?, "Enrollment not found");
    Ok(())
}

#[tokio::test]
async fn test_list_returns_every_enrollment_without_cache_header() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());

    let empty = get(&app, "/api/enrollments").await?;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.json()?, json!([]));

    create_enrollment(&app, "s1", "c1", "pending").await?;
    create_enrollment(&app, "s2", "c1", "active").await?;
    create_enrollment(&app, "s3", "c2", "completed").await?;

    let listed = get(&app, "/api/enrollments").await?;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(listed.cache_status().is_none());
    let items = listed.json()?;
    assert_eq!(items.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_explicit_enrollment_date_is_kept() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());

    let created = post_json(
        &app,
        "/api/enrollments",
        json!({
            "student_id": "s1",
            "course_id": "c1",
            "status": "pending",
            "enrollment_date": "2024-09-01T00:00:00Z",
        }),
    )
    .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    let expected: DateTime<Utc> = "2024-09-01T00:00:00Z".parse().map_err(|e: chrono::ParseError| e.to_string())?;
    assert_eq!(timestamp(&created.json()?, "enrollment_date")?, expected);
    Ok(())
}

// ============================================================================
// CACHE-ASIDE BEHAVIOR
// ============================================================================

#[tokio::test]
async fn test_cache_hit_skips_store() -> TestResult {
    let store = Arc::new(CountingEnrollmentStore::new());
    let (cache, backend) = fixtures::counting_cache();
    let app = build_app(store.clone(), cache);

    let id = create_enrollment(&app, "s1", "c1", "pending").await?;
    assert_eq!(backend.calls(), 0, "create must not touch the cache");

    get(&app, "/api/enrollments").await?;
    assert_eq!(backend.calls(), 0, "list must not touch the cache");

    let uri = format!("/api/enrollments/{}", id);
    get(&app, &uri).await?;
    assert_eq!(store.reads(), 1);
    assert_eq!(backend.sets(), 1);

    for _ in 0..3 {
        let hit = get(&app, &uri).await?;
        assert_eq!(hit.cache_status(), Some("HIT"));
    }
    assert_eq!(store.reads(), 1);
    assert_eq!(backend.gets(), 4);
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_not_cached() -> TestResult {
    let (cache, backend) = fixtures::counting_cache();
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), cache);

    for _ in 0..2 {
        let missing = get(&app, "/api/enrollments/does-not-exist").await?;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.cache_status(), Some("MISS"));
    }
    assert_eq!(backend.sets(), 0);
    assert!(!backend.contains("enrollment:does-not-exist").await);
    Ok(())
}

#[tokio::test]
async fn test_failing_cache_never_fails_requests() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::failing_cache());

    let id = create_enrollment(&app, "s1", "c1", "pending").await?;
    let uri = format!("/api/enrollments/{}", id);

    for _ in 0..2 {
        let read = get(&app, &uri).await?;
        assert_eq!(read.status, StatusCode::OK);
        assert_eq!(read.cache_status(), Some("MISS"));
    }

    let updated = put_json(
        &app,
        &uri,
        json!({"student_id": "s1", "course_id": "c1", "status": "completed"}),
    )
    .await?;
    assert_eq!(updated.status, StatusCode::OK);

    let deleted = delete(&app, &uri).await?;
    assert_eq!(deleted.status, StatusCode::OK);

    let stats = get(&app, "/cache/stats").await?.json()?;
    assert_eq!(stats["backend"], "failing");
    assert_eq!(stats["reachable"], false);
    assert_eq!(stats["hits"], 0);
    assert!(stats["errors"].as_u64().unwrap_or_default() >= 4);
    Ok(())
}

// ============================================================================
// VALIDATION AND ERRORS
// ============================================================================

#[tokio::test]
async fn test_validation_messages_name_the_first_bad_field() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());

    let cases = [
        (json!({"course_id": "c1", "status": "pending"}), "student_id is required"),
        (json!({"student_id": "  ", "course_id": "", "status": "x"}), "student_id is required"),
        (json!({"student_id": "s1", "status": "pending"}), "course_id is required"),
        (json!({"student_id": "s1", "course_id": "c1"}), "status is required"),
    ];

    for (body, expected) in cases {
        let response = post_json(&app, "/api/enrollments", body).await?;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_message()?, expected);
    }

    let bad_status = post_json(
        &app,
        "/api/enrollments",
        json!({"student_id": "s1", "course_id": "c1", "status": "dropped"}),
    )
    .await?;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
    assert!(bad_status.error_message()?.starts_with("status must be one of"));

    let listed = get(&app, "/api/enrollments").await?;
    assert_eq!(listed.json()?, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_undecodable_bodies_are_invalid_payloads() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());

    let malformed = send(
        &app,
        Method::POST,
        "/api/enrollments",
        Some("{not json".to_string()),
    )
    .await?;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.json()?, json!({"error": "Invalid request payload"}));

    let wrong_type = post_json(
        &app,
        "/api/enrollments",
        json!({"student_id": 7, "course_id": "c1", "status": "pending"}),
    )
    .await?;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.error_message()?, "Invalid request payload");
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_unknown_ids() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());

    let updated = put_json(
        &app,
        "/api/enrollments/missing",
        json!({"student_id": "s1", "course_id": "c1", "status": "active"}),
    )
    .await?;
    assert_eq!(updated.status, StatusCode::NOT_FOUND);
    assert_eq!(updated.error_message()?, "Enrollment not found");

    let deleted = delete(&app, "/api/enrollments/missing").await?;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);
    assert_eq!(deleted.json()?, json!({"error": "Enrollment not found"}));
    Ok(())
}

#[tokio::test]
async fn test_invalid_update_leaves_record_untouched() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());
    let id = create_enrollment(&app, "s1", "c1", "pending").await?;
    let uri = format!("/api/enrollments/{}", id);

    let rejected = put_json(
        &app,
        &uri,
        json!({"student_id": "s1", "course_id": "c1", "status": "unknown"}),
    )
    .await?;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let read = get(&app, &uri).await?;
    assert_eq!(read.json()?["status"], "pending");
    Ok(())
}

// ============================================================================
// SERVICE ENDPOINTS
// ============================================================================

#[tokio::test]
async fn test_root_banner_names_cache_mode() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());
    let banner = get(&app, "/").await?;
    assert_eq!(banner.status, StatusCode::OK);
    assert!(banner.text().starts_with("Registrar enrollment API v"));
    assert!(banner.text().ends_with("Cache: enabled (memory)"));
    Ok(())
}

#[tokio::test]
async fn test_health_degrades_when_cache_is_down() -> TestResult {
    let healthy = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());
    let response = get(&healthy, "/health").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?["status"], "healthy");

    let degraded = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::failing_cache());
    let response = get(&degraded, "/health").await?;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json()?;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["details"]["cache"]["status"], "degraded");
    assert_eq!(body["details"]["store"]["status"], "healthy");

    let ready = get(&degraded, "/health/ready").await?;
    assert_eq!(ready.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_cache_stats_track_hits_and_misses() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());
    let id = create_enrollment(&app, "s1", "c1", "pending").await?;
    let uri = format!("/api/enrollments/{}", id);
    get(&app, &uri).await?;
    get(&app, &uri).await?;

    let stats = get(&app, "/cache/stats").await?.json()?;
    assert_eq!(stats["backend"], "memory");
    assert_eq!(stats["enabled"], true);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["sets"], 1);
    assert_eq!(stats["ttl_seconds"], 300);
    assert_eq!(stats["hit_rate"], 0.5);
    Ok(())
}

#[tokio::test]
async fn test_metrics_and_openapi_are_served() -> TestResult {
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), fixtures::memory_cache());
    create_enrollment(&app, "s1", "c1", "pending").await?;

    let metrics = get(&app, "/metrics").await?;
    assert_eq!(metrics.status, StatusCode::OK);
    assert!(metrics.text().contains("registrar_http_requests_total"));

    let openapi = get(&app, "/openapi.json").await?;
    assert_eq!(openapi.status, StatusCode::OK);
    assert!(openapi.json()?["paths"].get("/api/enrollments/{id}").is_some());
    Ok(())
}

#[tokio::test]
async fn test_disabled_cache_reports_no_writes() -> TestResult {
    let cache = Arc::new(EnrollmentCache::new(Arc::new(NullCacheBackend)));
    let app = build_app(Arc::new(InMemoryEnrollmentStore::new()), cache);

    let id = create_enrollment(&app, "s1", "c1", "pending").await?;
    let uri = format!("/api/enrollments/{}", id);
    for _ in 0..2 {
        assert_eq!(get(&app, &uri).await?.cache_status(), Some("MISS"));
    }
    delete(&app, &uri).await?;

    let stats = get(&app, "/cache/stats").await?.json()?;
    assert_eq!(stats["enabled"], false);
    assert_eq!(stats["sets"], 0);
    assert_eq!(stats["invalidations"], 0);
    assert_eq!(stats["misses"], 2);

    let banner = get(&app, "/").await?;
    assert!(banner.text().ends_with("Cache: disabled (disabled)"));
    Ok(())
}
