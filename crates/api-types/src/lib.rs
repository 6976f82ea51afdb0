//! Shared request/response types used by API-facing crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod class;
mod coursework;
mod enrollment;
mod progress;
mod syllabus;
mod user;

pub use class::{
    ClassListItem, ClassListResponse, ClassResponse, CreateClassRequest, TeacherClassSummary,
    UpdateClassRequest, VisibilityResponse,
};
pub use coursework::{
    AssignmentDetailsResponse, AssignmentListResponse, AssignmentResponse,
    AssignmentReviewResponse, CreateAssignmentRequest, GradeSubmissionRequest, SubmissionResponse,
    SubmitAssignmentRequest, SubmitterResponse,
};
pub use enrollment::{
    EnrolledUser, EnrolledUsersResponse, EnrollmentResponse, NotEnrolledUser,
    NotEnrolledUsersResponse,
};
pub use progress::{ProgressResponse, TrackModuleResponse};
pub use syllabus::{
    ClassOverviewResponse, CreateMaterialRequest, CreateModuleRequest, MaterialNode,
    MaterialResponse, ModuleNode, ModuleResponse,
};
pub use user::UserResponse;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your request has been successfully processed";
pub const DEFAULT_ERROR_MESSAGE: &str = "Your request failed to be processed";

/// Field name to messages, as rendered in the `errors` member of the envelope.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: non_empty_or(message.into(), DEFAULT_SUCCESS_MESSAGE),
            data: Some(data),
            errors: None,
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: non_empty_or(message.into(), DEFAULT_SUCCESS_MESSAGE),
            data: None,
            errors: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: non_empty_or(message.into(), DEFAULT_ERROR_MESSAGE),
            data: None,
            errors: Some(errors),
        }
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn success_without_message_uses_default() {
        let response = ApiResponse::success(HealthCheckResponse::ok(), "");

        let json = serde_json::to_value(&response).expect("serialize envelope");
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn message_only_envelope_omits_data() {
        let response = ApiResponse::<()>::message("Successfully enrolled in the class");

        let json = serde_json::to_value(&response).expect("serialize envelope");
        assert_eq!(json["message"], "Successfully enrolled in the class");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn error_envelope_always_carries_errors_map() {
        let mut errors = FieldErrors::new();
        errors.insert("title".to_string(), vec!["title is required".to_string()]);

        let response = ApiResponse::<()>::error("", errors);

        let json = serde_json::to_value(&response).expect("serialize envelope");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], DEFAULT_ERROR_MESSAGE);
        assert_eq!(json["errors"]["title"][0], "title is required");

        let empty = ApiResponse::<()>::error("Class not found", FieldErrors::new());
        let json = serde_json::to_value(&empty).expect("serialize envelope");
        assert_eq!(json["errors"], serde_json::json!({}));
    }
}
