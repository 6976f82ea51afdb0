//! 请求体校验与路径参数解析。

use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// 反序列化后立即执行 `validator` 规则的 JSON 提取器。
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation("body", rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// 解析路径参数，失败时返回字段级校验错误。
pub fn path_param<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(name, format!("{name} is not a valid identifier")))
}

#[cfg(test)]
mod tests {
    use classroom_core::domain::{ClassId, UserId};

    use super::path_param;
    use crate::error::AppError;

    #[test]
    fn numeric_ids_parse() {
        let id: ClassId = path_param("id", "42").expect("42 is a valid class id");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn malformed_ids_are_validation_errors() {
        let err = path_param::<ClassId>("id", "abc").expect_err("abc is not numeric");
        assert!(matches!(err, AppError::Validation { .. }));

        assert!(path_param::<UserId>("studentId", "not-a-uuid").is_err());
    }
}
