//! Registrar API - REST API Layer
//!
//! HTTP surface for enrollment records. Reads by id go through a
//! cache-aside layer in front of the in-memory record store; writes go to
//! the store first and invalidate the cache afterwards.

pub mod config;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{ApiConfig, CacheBackendKind, CacheSettings};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::EnrollmentService;
pub use state::{connect_cache_backend, AppState};
pub use types::*;
