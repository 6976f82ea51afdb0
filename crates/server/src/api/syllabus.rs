//! 课程大纲编写路由。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use classroom_api_types::{
    ApiResponse, CreateMaterialRequest, CreateModuleRequest, MaterialResponse, ModuleResponse,
};
use classroom_core::domain::{ClassId, MaterialId};

use super::{AppState, Identity, ValidatedJson, extract::path_param};
use crate::error::AppError;
use crate::repository::NewModule;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/class/{id}/materials", post(create_material))
        .route("/class/{id}/materials/{materialId}/modules", post(create_module))
}

async fn create_material(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaterialResponse>>), AppError> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let material = state
        .syllabus
        .create_material(owner_id, class_id, request.title)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(material.into(), "Material created")),
    ))
}

async fn create_module(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path((id, material_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<CreateModuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ModuleResponse>>), AppError> {
    let owner_id = identity.class_manager()?;
    let class_id: ClassId = path_param("id", &id)?;
    let material_id: MaterialId = path_param("materialId", &material_id)?;
    let module = state
        .syllabus
        .create_module(
            owner_id,
            class_id,
            material_id,
            NewModule {
                title: request.title,
                content: request.content,
                attachments: request.attachments,
                videos: request.videos,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(module.into(), "Module created")),
    ))
}
