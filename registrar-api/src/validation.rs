//! Validation Traits
//!
//! Request validation runs before anything reaches the orchestrator and
//! turns a raw [`EnrollmentRequest`] into a typed [`EnrollmentDraft`].

use registrar_core::{EnrollmentDraft, EnrollmentStatus, ValidationError};

use crate::types::EnrollmentRequest;

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use registrar_api::validation::ValidateNonEmpty;
///
/// request.student_id.validate_non_empty("student_id")?;
/// ```
pub trait ValidateNonEmpty {
    /// Fails with `RequiredFieldMissing` if the value is empty or whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        if self.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: field_name.to_string(),
            });
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ValidationError::RequiredFieldMissing {
                field: field_name.to_string(),
            }),
        }
    }
}

/// Parse an enrollment status, naming the accepted values on failure.
pub fn parse_status(raw: &str) -> Result<EnrollmentStatus, ValidationError> {
    raw.validate_non_empty("status")?;
    raw.parse::<EnrollmentStatus>()
        .map_err(|_| ValidationError::InvalidChoice {
            field: "status".to_string(),
            allowed: EnrollmentStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

impl TryFrom<EnrollmentRequest> for EnrollmentDraft {
    type Error = ValidationError;

    /// Fields are checked in a fixed order and the first failure wins.
    fn try_from(request: EnrollmentRequest) -> Result<Self, Self::Error> {
        request.student_id.validate_non_empty("student_id")?;
        request.course_id.validate_non_empty("course_id")?;
        let status = parse_status(&request.status)?;

        Ok(EnrollmentDraft {
            student_id: request.student_id,
            course_id: request.course_id,
            status,
            enrollment_date: request.enrollment_date,
        })
    }
}
