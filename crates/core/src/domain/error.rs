use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid grade: {0}. grade must be in [0, 100]")]
    InvalidGrade(u16),

    #[error("invalid class status: '{0}'. expected 'public' or 'draft'")]
    InvalidClassStatus(String),

    #[error("invalid enrollment status: '{0}'")]
    InvalidEnrollmentStatus(String),

    #[error("invalid progress status: '{0}'")]
    InvalidProgressStatus(String),

    #[error("invalid submission status: '{0}'")]
    InvalidSubmissionStatus(String),

    #[error("invalid role: '{0}'")]
    InvalidRole(String),

    #[error("completed modules ({completed}) exceed total modules ({total})")]
    ProgressOverflow { completed: u64, total: u64 },
}
