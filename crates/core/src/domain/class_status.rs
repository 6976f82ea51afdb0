use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Visibility of a class. The only transition after creation is [`ClassStatus::toggled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassStatus {
    Public,
    Draft,
}

impl ClassStatus {
    pub const PUBLIC: &'static str = "public";
    pub const DRAFT: &'static str = "draft";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => Self::PUBLIC,
            Self::Draft => Self::DRAFT,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Public => Self::Draft,
            Self::Draft => Self::Public,
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PUBLIC => Ok(Self::Public),
            Self::DRAFT => Ok(Self::Draft),
            other => Err(DomainError::InvalidClassStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClassStatus;

    #[test]
    fn toggle_is_an_involution() {
        for status in [ClassStatus::Public, ClassStatus::Draft] {
            assert_ne!(status.toggled(), status);
            assert_eq!(status.toggled().toggled(), status);
        }
    }

    #[test]
    fn parses_only_known_literals() {
        assert_eq!("public".parse::<ClassStatus>(), Ok(ClassStatus::Public));
        assert_eq!("draft".parse::<ClassStatus>(), Ok(ClassStatus::Draft));

        let err = "draf".parse::<ClassStatus>().expect_err("typo should be rejected");
        assert_eq!(
            err.to_string(),
            "invalid class status: 'draf'. expected 'public' or 'draft'"
        );
    }
}
