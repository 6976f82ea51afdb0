//! 班级路由：目录、概览、创建、修改、删除与可见性切换。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use classroom_api_types::{
    ApiResponse, ClassListItem, ClassListResponse, ClassOverviewResponse, ClassResponse,
    CreateClassRequest, TeacherClassSummary, UpdateClassRequest, VisibilityResponse,
};
use classroom_core::domain::ClassId;

use super::{
    ApiResult, AppState, Identity, MaybeIdentity, ValidatedJson, extract::path_param,
};
use crate::error::AppError;
use crate::repository::{ClassChanges, NewClass};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/class", get(list_classes).post(create_class))
        // 当前教师拥有的班级及统计
        .route("/class/admin", get(list_owned_classes))
        .route(
            "/class/{id}",
            get(class_overview)
                .put(update_class)
                .delete(delete_class)
                .patch(toggle_visibility),
        )
}

/// 全部班级，附带调用方的选课状态与进度。
async fn list_classes(
    State(state): State<Arc<AppState>>,
    viewer: MaybeIdentity,
) -> ApiResult<ClassListResponse> {
    let classes: Vec<ClassListItem> = state
        .overview
        .list_classes(viewer.user_id())
        .await?
        .into_iter()
        .map(ClassListItem::from)
        .collect();

    let total = classes.len();
    Ok(Json(ApiResponse::success(
        ClassListResponse { classes, total },
        "Successfully retrieved all classes",
    )))
}

async fn create_class(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidatedJson(request): ValidatedJson<CreateClassRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClassResponse>>), AppError> {
    let owner_id = identity.class_manager()?;
    let class = state
        .classes
        .create(NewClass {
            owner_id,
            title: request.title,
            description: request.description,
            image: request.image,
            video: request.video,
            status: request.status,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(class.into(), "Class created")),
    ))
}

async fn list_owned_classes(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> ApiResult<Vec<TeacherClassSummary>> {
    let owner_id = identity.class_manager()?;
    let classes = state
        .classes
        .list_owned(owner_id)
        .await?
        .into_iter()
        .map(TeacherClassSummary::from)
        .collect();

    Ok(Json(ApiResponse::success(classes, "")))
}

/// 班级详情：选课状态、课程大纲与缓存进度。
async fn class_overview(
    State(state): State<Arc<AppState>>,
    viewer: MaybeIdentity,
    Path(id): Path<String>,
) -> ApiResult<ClassOverviewResponse> {
    let class_id: ClassId = path_param("id", &id)?;
    let overview = state.overview.overview(viewer.user_id(), class_id).await?;

    Ok(Json(ApiResponse::success(overview.into(), "")))
}

async fn update_class(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateClassRequest>,
) -> ApiResult<ClassResponse> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let class = state
        .classes
        .update(
            owner_id,
            class_id,
            ClassChanges {
                title: request.title,
                description: request.description,
                image: request.image,
                video: request.video,
                status: request.status,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(class.into(), "Class updated")))
}

async fn delete_class(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    state.classes.delete(owner_id, class_id).await?;

    Ok(Json(ApiResponse::message("Delete Class Successful")))
}

async fn toggle_visibility(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<VisibilityResponse> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let class = state.classes.toggle_visibility(owner_id, class_id).await?;

    Ok(Json(ApiResponse::success(class.into(), "Class visibility updated")))
}
