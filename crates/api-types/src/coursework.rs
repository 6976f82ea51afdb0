use chrono::NaiveDateTime;
use classroom_core::domain::SubmissionStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub id: i64,
    pub class_id: i64,
    pub creator_assignment_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<AssignmentResponse>,
    pub total: usize,
}

/// Student view: the assignment plus the caller's own submission, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetailsResponse {
    pub assignment: AssignmentResponse,
    pub submission: Option<SubmissionResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterResponse {
    pub submission_id: i64,
    pub student_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub status: SubmissionStatus,
    pub grade: Option<u16>,
    pub submitted_at: NaiveDateTime,
}

/// Class owner view: the assignment plus every submission made for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentReviewResponse {
    pub assignment: AssignmentResponse,
    pub submissions: Vec<SubmitterResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmitAssignmentRequest {
    #[validate(url(message = "link must be a valid URL"))]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GradeSubmissionRequest {
    #[validate(range(max = 100, message = "grade must be in [0, 100]"))]
    pub grade: u16,
    #[serde(default)]
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: Uuid,
    pub link: String,
    pub status: SubmissionStatus,
    pub grade: Option<u16>,
    pub feedback: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub graded_at: Option<NaiveDateTime>,
}
