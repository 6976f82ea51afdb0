//! 选课路由：自主选课、教师添加/移除学生与花名册。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use classroom_api_types::{
    ApiResponse, EnrolledUser, EnrolledUsersResponse, EnrollmentResponse, NotEnrolledUser,
    NotEnrolledUsersResponse,
};
use classroom_core::domain::{ClassId, UserId};

use super::{ApiResult, AppState, Identity, extract::path_param};
use crate::error::AppError;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/class/{id}/enroll", post(enroll))
        .route("/class/{id}/users", get(enrolled_users))
        .route(
            "/class/{id}/users/{studentId}",
            post(add_student).delete(remove_student),
        )
        .route("/class/{id}/users-not-enrolled", get(not_enrolled_users))
}

async fn enroll(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let class_id: ClassId = path_param("id", &id)?;
    state.enrollments.enroll(identity.user_id, class_id).await?;

    Ok(Json(ApiResponse::message("Successfully enrolled in the class")))
}

async fn enrolled_users(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<EnrolledUsersResponse> {
    let teacher_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let users_enrolled: Vec<EnrolledUser> = state
        .enrollments
        .roster(teacher_id, class_id)
        .await?
        .into_iter()
        .map(EnrolledUser::from)
        .collect();

    let total = users_enrolled.len();
    Ok(Json(ApiResponse::success(
        EnrolledUsersResponse {
            users_enrolled,
            total,
        },
        "",
    )))
}

/// 教师将学生加入自己的班级。
async fn add_student(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ApiResponse<EnrollmentResponse>>), AppError> {
    let teacher_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let student_id: UserId = path_param("studentId", &student_id)?;
    let enrollment = state
        .enrollments
        .add_student(teacher_id, class_id, student_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            enrollment.into(),
            "Successfully add user to this class",
        )),
    ))
}

async fn remove_student(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path((id, student_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let teacher_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let student_id: UserId = path_param("studentId", &student_id)?;
    state
        .enrollments
        .remove_student(teacher_id, class_id, student_id)
        .await?;

    Ok(Json(ApiResponse::message(
        "Successfully to delete users from the class",
    )))
}

async fn not_enrolled_users(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<NotEnrolledUsersResponse> {
    let teacher_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let students: Vec<NotEnrolledUser> = state
        .enrollments
        .not_enrolled(teacher_id, class_id)
        .await?
        .into_iter()
        .map(NotEnrolledUser::from)
        .collect();

    let total = students.len();
    Ok(Json(ApiResponse::success(
        NotEnrolledUsersResponse { students, total },
        "Successfully to get all users not enrolled in this class",
    )))
}
