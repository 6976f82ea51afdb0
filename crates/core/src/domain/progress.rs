use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Done,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(Self::Done),
            other => Err(DomainError::InvalidProgressStatus(other.to_string())),
        }
    }
}

/// Module completion counts for one user in one class.
///
/// The percentage is always derived from the counts and never stored on its
/// own; `completed` can not exceed `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    completed: u64,
    total: u64,
}

impl Progress {
    pub fn new(completed: u64, total: u64) -> Result<Self, DomainError> {
        if completed > total {
            return Err(DomainError::ProgressOverflow { completed, total });
        }

        Ok(Self { completed, total })
    }

    pub fn completed(self) -> u64 {
        self.completed
    }

    pub fn total(self) -> u64 {
        self.total
    }

    /// `completed / total * 100`, or `0.0` for a class without modules. Not rounded.
    pub fn percentage(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        (self.completed as f64 / self.total as f64) * 100.0
    }
}
