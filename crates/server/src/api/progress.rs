//! 学习进度路由。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use classroom_api_types::{ApiResponse, ProgressResponse, TrackModuleResponse};
use classroom_core::domain::{ClassId, MaterialId, ModuleId};

use super::{ApiResult, AppState, Identity, dto::progress_response, extract::path_param};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/class/{id}/progress", get(class_progress))
        .route(
            "/class/{id}/materials/{materialId}/modules/{moduleId}/complete",
            post(complete_module),
        )
}

/// 从模块完成记录实时计算进度，不读缓存。
async fn class_progress(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<ProgressResponse> {
    let class_id: ClassId = path_param("id", &id)?;
    let progress = state.progress.report(identity.user_id, class_id).await?;

    Ok(Json(ApiResponse::success(
        progress_response(class_id, progress),
        "",
    )))
}

async fn complete_module(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path((id, material_id, module_id)): Path<(String, String, String)>,
) -> ApiResult<TrackModuleResponse> {
    let class_id: ClassId = path_param("id", &id)?;
    let material_id: MaterialId = path_param("materialId", &material_id)?;
    let module_id: ModuleId = path_param("moduleId", &module_id)?;

    let tracked = state
        .progress
        .track(identity.user_id, class_id, material_id, module_id)
        .await?;

    Ok(Json(ApiResponse::success(
        tracked.into(),
        "Module marked as completed",
    )))
}
