//! API 路由模块。
//!
//! 所有业务路由挂在 `/users` 下，统一使用 `ApiResponse` 信封返回。

mod auth;
mod class;
mod coursework;
mod dto;
mod enrollment;
mod extract;
mod progress;
pub mod state;
mod syllabus;
mod user;

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::get};
use classroom_api_types::{ApiResponse, FieldErrors, HealthCheckResponse};
use tower_http::trace::TraceLayer;

pub use auth::{Identity, MaybeIdentity, USER_ID_HEADER, USER_ROLE_HEADER};
pub use extract::ValidatedJson;
pub use state::AppState;

use crate::error::AppError;

pub(crate) type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// 创建完整的 HTTP 路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    let users = Router::new()
        .merge(user::router())
        .merge(class::router())
        .merge(enrollment::router())
        .merge(progress::router())
        .merge(syllabus::router())
        .merge(coursework::router());

    Router::new()
        .route("/health", get(health))
        .nest("/users", users)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}

async fn route_not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Route not found", FieldErrors::new())),
    )
}
