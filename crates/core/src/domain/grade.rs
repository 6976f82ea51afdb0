use super::DomainError;

/// Teacher-assigned grade on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(u16);

impl Grade {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 100;

    pub fn new(value: u16) -> Result<Self, DomainError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidGrade(value))
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Grade {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for u16 {
    fn from(value: Grade) -> Self {
        value.value()
    }
}

#[cfg(test)]
mod tests {
    use super::Grade;

    #[test]
    fn boundary_grades_are_accepted() {
        assert_eq!(Grade::new(0).expect("0 should be valid").value(), 0);
        assert_eq!(Grade::new(100).expect("100 should be valid").value(), 100);
    }

    #[test]
    fn grade_above_maximum_is_rejected() {
        let err = Grade::new(101).expect_err("101 should be rejected");

        assert_eq!(
            err.to_string(),
            "invalid grade: 101. grade must be in [0, 100]"
        );
    }
}
