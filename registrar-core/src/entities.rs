//! Entity types for Registrar

use serde::{Deserialize, Serialize};

use crate::{EnrollmentId, EnrollmentStatus, Timestamp};

/// A student's enrollment in a course.
///
/// `created_at` is stamped once on creation and carried over by every
/// replacement; `updated_at` moves on every successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: String,
    pub course_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub enrollment_date: Timestamp,
    pub status: EnrollmentStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

/// Validated client-supplied fields of an enrollment.
///
/// Produced by the API's validation step; the orchestrator turns it into an
/// [`Enrollment`] by stamping ids and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentDraft {
    pub student_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    pub enrollment_date: Option<Timestamp>,
}

impl Enrollment {
    /// Build a brand new record from a draft.
    ///
    /// `created_at` and `updated_at` are both set to `now`, and a missing
    /// enrollment date defaults to `now` as well.
    pub fn from_draft(id: EnrollmentId, draft: EnrollmentDraft, now: Timestamp) -> Self {
        Self {
            id,
            student_id: draft.student_id,
            course_id: draft.course_id,
            enrollment_date: draft.enrollment_date.unwrap_or(now),
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the full replacement of this record.
    ///
    /// Keeps `id` and `created_at`; keeps the current enrollment date when
    /// the draft does not carry one.
    pub fn replaced_by(&self, draft: EnrollmentDraft, now: Timestamp) -> Self {
        Self {
            id: self.id.clone(),
            student_id: draft.student_id,
            course_id: draft.course_id,
            enrollment_date: draft.enrollment_date.unwrap_or(self.enrollment_date),
            status: draft.status,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn draft(status: EnrollmentStatus) -> EnrollmentDraft {
        EnrollmentDraft {
            student_id: "s1".to_string(),
            course_id: "c1".to_string(),
            status,
            enrollment_date: None,
        }
    }

    #[test]
    fn test_from_draft_stamps_timestamps() {
        let now = Utc::now();
        let e = Enrollment::from_draft("id-1".to_string(), draft(EnrollmentStatus::Pending), now);
        assert_eq!(e.id, "id-1");
        assert_eq!(e.created_at, now);
        assert_eq!(e.updated_at, now);
        assert_eq!(e.enrollment_date, now);
    }

    #[test]
    fn test_from_draft_keeps_explicit_enrollment_date() {
        let now = Utc::now();
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let mut d = draft(EnrollmentStatus::Active);
        d.enrollment_date = Some(date);
        let e = Enrollment::from_draft("id-1".to_string(), d, now);
        assert_eq!(e.enrollment_date, date);
    }

    #[test]
    fn test_replaced_by_preserves_identity_and_creation() {
        let created = Utc::now();
        let original =
            Enrollment::from_draft("id-1".to_string(), draft(EnrollmentStatus::Pending), created);

        let later = created + Duration::seconds(5);
        let replaced = original.replaced_by(draft(EnrollmentStatus::Active), later);

        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.created_at, created);
        assert_eq!(replaced.enrollment_date, original.enrollment_date);
        assert_eq!(replaced.updated_at, later);
        assert_eq!(replaced.status, EnrollmentStatus::Active);
    }

    #[test]
    fn test_enrollment_json_field_names() -> Result<(), serde_json::Error> {
        let e = Enrollment::from_draft("id-1".to_string(), draft(EnrollmentStatus::Pending), Utc::now());
        let value = serde_json::to_value(&e)?;
        for field in [
            "id",
            "student_id",
            "course_id",
            "enrollment_date",
            "status",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(value["status"], "pending");
        Ok(())
    }

    #[cfg(feature = "openapi")]
    #[test]
    fn test_timestamp_fields_document_as_date_time() -> Result<(), serde_json::Error> {
        use utoipa::PartialSchema;

        let schema = serde_json::to_value(Enrollment::schema())?;
        for field in ["enrollment_date", "created_at", "updated_at"] {
            let property = &schema["properties"][field];
            assert_eq!(property["type"], "string", "{}", field);
            assert_eq!(property["format"], "date-time", "{}", field);
        }
        Ok(())
    }
}
