//! Shared helpers for driving the full router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use registrar_api::{create_api_router, ApiConfig, AppState};
use registrar_storage::{EnrollmentCache, EnrollmentStore};
use serde_json::Value;
use tower::ServiceExt;

/// Router over the given store and cache with default configuration.
pub fn build_app(store: Arc<dyn EnrollmentStore>, cache: Arc<EnrollmentCache>) -> Router {
    let state = AppState::new(store, cache, "test");
    create_api_router(state, &ApiConfig::default())
}

/// Captured response: status, headers and the raw body.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value, String> {
        serde_json::from_slice(&self.body).map_err(|e| format!("body is not JSON: {}", e))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of `X-Cache-Status`, if present.
    pub fn cache_status(&self) -> Option<&str> {
        self.headers
            .get("x-cache-status")
            .and_then(|v| v.to_str().ok())
    }

    /// The `error` field of an error body.
    pub fn error_message(&self) -> Result<String, String> {
        self.json()?
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| format!("no error field in {}", self.text()))
    }
}

/// Send one request through a clone of `app`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> Result<TestResponse, String> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(raw)
        }
        None => Body::empty(),
    };
    let request = builder.body(body).map_err(|e| e.to_string())?;

    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| e.to_string())?;

    Ok(TestResponse {
        status,
        headers,
        body: bytes.to_vec(),
    })
}

pub async fn get(app: &Router, uri: &str) -> Result<TestResponse, String> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Result<TestResponse, String> {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Result<TestResponse, String> {
    send(app, Method::PUT, uri, Some(body.to_string())).await
}

pub async fn delete(app: &Router, uri: &str) -> Result<TestResponse, String> {
    send(app, Method::DELETE, uri, None).await
}

/// Create an enrollment and return its id.
pub async fn create_enrollment(
    app: &Router,
    student_id: &str,
    course_id: &str,
    status: &str,
) -> Result<String, String> {
    let response = post_json(
        app,
        "/api/enrollments",
        serde_json::json!({
            "student_id": student_id,
            "course_id": course_id,
            "status": status,
        }),
    )
    .await?;
    if response.status != StatusCode::CREATED {
        return Err(format!("create failed: {} {}", response.status, response.text()));
    }
    response
        .json()?
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "created enrollment has no id".to_string())
}
