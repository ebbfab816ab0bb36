//! Service Layer
//!
//! Business logic sitting between the HTTP handlers and storage. Handlers
//! validate and render; services decide when the cache and the record store
//! are consulted.

mod enrollment_service;

pub use enrollment_service::*;
