//! Error Types for Registrar API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct carried through handlers
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation rendering `{"error": "<message>"}`
//!
//! Domain errors from `registrar-core` convert into `ApiError` so handlers
//! can use `?` throughout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registrar_core::{ConfigError, RegistrarError, StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code. The code is not
/// part of the wire body; it drives the status and the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request body could not be decoded
    InvalidPayload,

    /// A field failed validation
    ValidationFailed,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested enrollment does not exist
    EnrollmentNotFound,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// Enrollment with the same id already exists
    EnrollmentAlreadyExists,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Service is not ready to serve requests
    ServiceUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidPayload | ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,

            ErrorCode::EnrollmentNotFound => StatusCode::NOT_FOUND,

            ErrorCode::EnrollmentAlreadyExists => StatusCode::CONFLICT,

            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPayload => "Invalid request payload",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::EnrollmentNotFound => "Enrollment not found",
            ErrorCode::EnrollmentAlreadyExists => "Enrollment already exists",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Error returned by API handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message, sent to the client
    pub message: String,
}

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Undecodable request body.
    pub fn invalid_payload() -> Self {
        Self::from_code(ErrorCode::InvalidPayload)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::EnrollmentNotFound)
    }

    pub fn already_exists() -> Self {
        Self::from_code(ErrorCode::EnrollmentAlreadyExists)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Renders as the status for `code` with body `{"error": message}`.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.message,
        });
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::not_found(),
            StorageError::AlreadyExists { .. } => ApiError::already_exists(),
            StorageError::LockPoisoned => {
                tracing::error!(error = %err, "Record store unusable");
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation_failed(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

impl From<RegistrarError> for ApiError {
    fn from(err: RegistrarError) -> Self {
        match err {
            RegistrarError::Storage(e) => e.into(),
            RegistrarError::Validation(e) => e.into(),
            RegistrarError::Config(e) => e.into(),
            // Cache failures are absorbed by the orchestrator; reaching here is a bug.
            RegistrarError::Cache(e) => {
                tracing::error!(error = %e, "Cache error escaped the service layer");
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
