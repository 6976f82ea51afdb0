use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotSubmitYet,
    Submitted,
    Graded,
    Revision,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSubmitYet => "not_submit_yet",
            Self::Submitted => "submitted",
            Self::Graded => "graded",
            Self::Revision => "revision",
        }
    }

    /// Statuses a teacher may set when grading.
    pub fn is_graded(self) -> bool {
        matches!(self, Self::Graded | Self::Revision)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_submit_yet" => Ok(Self::NotSubmitYet),
            "submitted" => Ok(Self::Submitted),
            "graded" => Ok(Self::Graded),
            "revision" => Ok(Self::Revision),
            other => Err(DomainError::InvalidSubmissionStatus(other.to_string())),
        }
    }
}
