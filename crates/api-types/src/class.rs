use chrono::NaiveDateTime;
use classroom_core::domain::{ClassStatus, EnrollmentStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    pub status: ClassStatus,
}

/// Full replacement of the mutable class fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    pub status: ClassStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassResponse {
    pub id: i64,
    pub creator_class_id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub status: ClassStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityResponse {
    pub id: i64,
    pub title: String,
    pub status: ClassStatus,
}

/// Catalog entry with the caller's relationship to the class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListItem {
    #[serde(flatten)]
    pub class: ClassResponse,
    pub enrollment_status: EnrollmentStatus,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListResponse {
    pub classes: Vec<ClassListItem>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherClassSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: ClassStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub materials_total: u64,
    pub modules_total: u64,
    pub student_enrolled_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rejects_unknown_status() {
        let raw = r#"{"title":"Rust 101","status":"draf"}"#;

        assert!(serde_json::from_str::<CreateClassRequest>(raw).is_err());
    }

    #[test]
    fn create_request_requires_title() {
        let request: CreateClassRequest =
            serde_json::from_str(r#"{"title":"","status":"public"}"#).expect("shape is valid");

        let errors = request.validate().expect_err("empty title should fail validation");
        assert!(errors.field_errors().contains_key("title"));
    }
}
