//! 用户资料路由。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use classroom_api_types::{ApiResponse, UserResponse};

use super::{ApiResult, AppState, Identity};
use crate::error::AppError;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(me))
}

/// 当前调用方的资料。
async fn me(State(state): State<Arc<AppState>>, identity: Identity) -> ApiResult<UserResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    Ok(Json(ApiResponse::success(user.into(), "")))
}
