//! 调用方身份提取。
//!
//! 认证由上游网关完成，网关通过 `x-user-id` 与 `x-user-role` 头转发已校验的身份，
//! 本服务直接信任这两个头。

use std::str::FromStr;

use axum::{extract::FromRequestParts, http::request::Parts};
use classroom_core::domain::{Role, UserId};

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// 已认证的调用方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    /// 班级管理类操作要求教师或管理员角色。
    pub fn class_manager(self) -> Result<UserId, AppError> {
        if self.role.can_manage_classes() {
            Ok(self.user_id)
        } else {
            Err(AppError::Forbidden)
        }
    }

    fn from_parts(parts: &Parts) -> Result<Option<Self>, AppError> {
        let Some(raw_id) = header(parts, USER_ID_HEADER) else {
            return Ok(None);
        };

        let user_id = UserId::from_str(raw_id)
            .map_err(|_| AppError::Unauthenticated("invalid user id header"))?;
        let role = match header(parts, USER_ROLE_HEADER) {
            Some(raw_role) => Role::from_str(raw_role)
                .map_err(|_| AppError::Unauthenticated("invalid user role header"))?,
            None => Role::User,
        };

        Ok(Some(Self { user_id, role }))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)?.ok_or(AppError::Unauthenticated("missing user identity"))
    }
}

/// 可选身份，匿名访问时为 `None`。
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.map(|identity| identity.user_id)
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Identity::from_parts(parts)?))
    }
}
