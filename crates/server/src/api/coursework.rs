//! 作业、提交与评分路由。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use classroom_api_types::{
    ApiResponse, AssignmentDetailsResponse, AssignmentListResponse, AssignmentResponse,
    AssignmentReviewResponse, CreateAssignmentRequest, GradeSubmissionRequest,
    SubmissionResponse, SubmitAssignmentRequest,
};
use classroom_core::domain::{AssignmentId, ClassId, Grade, SubmissionId};

use super::{ApiResult, AppState, Identity, ValidatedJson, extract::path_param};
use crate::error::AppError;
use crate::repository::{AssignmentRecord, GradeSubmission, NewAssignment};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/class/{id}/assignments",
            get(class_assignments).post(create_assignment),
        )
        .route("/assignments/{assignmentId}", get(assignment_details))
        .route("/assignments/{assignmentId}/submissions", post(submit_assignment))
        .route("/teacher/class/{id}/assignments", get(owned_class_assignments))
        .route("/teacher/assignments/{assignmentId}", get(review_assignment))
        .route("/submissions/{submissionId}", get(submission_details))
        .route("/submissions/{submissionId}/grade", post(grade_submission))
}

async fn create_assignment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentResponse>>), AppError> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let assignment = state
        .coursework
        .create_assignment(
            owner_id,
            class_id,
            NewAssignment {
                title: request.title,
                description: request.description,
                due_date: request.due_date,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(assignment.into(), "Assignment created")),
    ))
}

fn assignment_list(assignments: Vec<AssignmentRecord>) -> AssignmentListResponse {
    let assignments: Vec<AssignmentResponse> = assignments
        .into_iter()
        .map(AssignmentResponse::from)
        .collect();
    AssignmentListResponse {
        total: assignments.len(),
        assignments,
    }
}

/// 班级作业列表，登录用户可见。
async fn class_assignments(
    State(state): State<Arc<AppState>>,
    _identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<AssignmentListResponse> {
    let class_id: ClassId = path_param("id", &id)?;
    let assignments = state.coursework.class_assignments(class_id).await?;

    Ok(Json(ApiResponse::success(assignment_list(assignments), "")))
}

/// 作业详情，附带调用者自己的提交。
async fn assignment_details(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(assignment_id): Path<String>,
) -> ApiResult<AssignmentDetailsResponse> {
    let assignment_id: AssignmentId = path_param("assignmentId", &assignment_id)?;
    let details = state
        .coursework
        .assignment_details(identity.user_id, assignment_id)
        .await?;

    Ok(Json(ApiResponse::success(details.into(), "")))
}

async fn owned_class_assignments(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<AssignmentListResponse> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let assignments = state
        .coursework
        .owned_class_assignments(owner_id, class_id)
        .await?;

    Ok(Json(ApiResponse::success(assignment_list(assignments), "")))
}

/// 教师查看作业及全部提交。
async fn review_assignment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(assignment_id): Path<String>,
) -> ApiResult<AssignmentReviewResponse> {
    let owner_id = identity.class_manager()?;
    let assignment_id: AssignmentId = path_param("assignmentId", &assignment_id)?;
    let review = state
        .coursework
        .review_assignment(owner_id, assignment_id)
        .await?;

    Ok(Json(ApiResponse::success(review.into(), "")))
}

async fn submit_assignment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(assignment_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SubmitAssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), AppError> {
    let assignment_id: AssignmentId = path_param("assignmentId", &assignment_id)?;
    let submission = state
        .coursework
        .submit(identity.user_id, assignment_id, request.link)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(submission.into(), "Assignment submitted")),
    ))
}

/// 学生查看自己的提交。
async fn submission_details(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(submission_id): Path<String>,
) -> ApiResult<SubmissionResponse> {
    let submission_id: SubmissionId = path_param("submissionId", &submission_id)?;
    let submission = state
        .coursework
        .submission(identity.user_id, submission_id)
        .await?;

    Ok(Json(ApiResponse::success(submission.into(), "")))
}

/// 教师评分，每份提交只能评一次。
async fn grade_submission(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(submission_id): Path<String>,
    ValidatedJson(request): ValidatedJson<GradeSubmissionRequest>,
) -> ApiResult<SubmissionResponse> {
    let teacher_id = identity.class_manager()?;
    let submission_id: SubmissionId = path_param("submissionId", &submission_id)?;
    let grading = GradeSubmission {
        grade: Grade::new(request.grade)?,
        feedback: request.feedback,
        status: request.status,
    };

    let submission = state
        .coursework
        .grade(teacher_id, submission_id, grading)
        .await?;

    Ok(Json(ApiResponse::success(submission.into(), "Submission graded")))
}
