//! JSON body extractor with the API's error shape.
//!
//! Axum's `Json<T>` rejects bad bodies with plain-text responses of varying
//! status. `JsonBody<T>` reports every decoding failure as
//! `400 {"error": "Invalid request payload"}`.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Extractor for JSON request bodies.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_enrollment(
///     JsonBody(req): JsonBody<EnrollmentRequest>,
/// ) -> ApiResult<impl IntoResponse> {
///     let draft = EnrollmentDraft::try_from(req)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError::invalid_payload())
            }
        }
    }
}
