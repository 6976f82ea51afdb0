use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classroom_api_types::{ApiResponse, FieldErrors};
use classroom_core::domain::DomainError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Coarse classification every [`AppError`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("User is already enrolled in the class")]
    AlreadyEnrolled,

    #[error("Assignment has already been submitted")]
    AlreadySubmitted,

    #[error("Class with that id was not found")]
    ClassNotFound,

    #[error("{0} not found")]
    NotFound(String),

    /// Ownership-scoped writes that touched no row. Missing target and foreign
    /// owner are deliberately reported the same way.
    #[error("{0}")]
    NotFoundOrUnauthorized(&'static str),

    #[error("{0}")]
    InvalidReference(String),

    #[error("Unauthorized: {0}")]
    Unauthenticated(&'static str),

    #[error("Forbidden: insufficient role")]
    Forbidden,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.clone()]);
        Self::Validation { message, errors }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::Domain(_) => ErrorKind::Validation,
            Self::ClassNotFound | Self::NotFound(_) | Self::NotFoundOrUnauthorized(_) => {
                ErrorKind::NotFound
            }
            Self::AlreadyEnrolled | Self::AlreadySubmitted | Self::InvalidReference(_) => {
                ErrorKind::Conflict
            }
            Self::Unauthenticated(_) | Self::Forbidden => ErrorKind::Unauthorized,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::Domain(_)
            | Self::AlreadyEnrolled
            | Self::AlreadySubmitted => StatusCode::BAD_REQUEST,
            Self::ClassNotFound | Self::NotFound(_) | Self::NotFoundOrUnauthorized(_) => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidReference(_) => StatusCode::CONFLICT,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{field} is invalid ({})", e.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self::Validation {
            message: "Your request failed to be processed".to_string(),
            errors: fields,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, errors) = match self {
            Self::Validation { message, errors } => (message, errors),
            Self::Database(err) => {
                error!(error = %err, "unhandled database error");
                ("Internal server error".to_string(), FieldErrors::new())
            }
            Self::Internal(err) => {
                error!(error = ?err, "unhandled internal error");
                ("Internal server error".to_string(), FieldErrors::new())
            }
            other => (other.to_string(), FieldErrors::new()),
        };

        (status, Json(ApiResponse::<()>::error(message, errors))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_failures_fold_into_not_found() {
        let err = AppError::NotFoundOrUnauthorized("Class not found or unauthorized access");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_enrollment_is_a_conflict_reported_as_bad_request() {
        let err = AppError::AlreadyEnrolled;

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_details_are_not_rendered() {
        let err = AppError::Internal(anyhow::anyhow!("connection reset by peer"));

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_helper_keys_errors_by_field() {
        let err = AppError::validation("id", "id must be a number");

        match err {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "id must be a number");
                assert_eq!(errors["id"], vec!["id must be a number".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
