use std::sync::Arc;

use classroom_core::domain::{ClassId, UserId};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::repository::{
    ClassRepository, EnrolledUserRecord, EnrollmentRecord, EnrollmentRepository, UserRecord,
};

use super::ensure_owned;

const STUDENT_NOT_REMOVABLE: &str = "Student not enrolled or class not found or unauthorized access";

pub struct EnrollmentManager {
    classes: Arc<dyn ClassRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentManager {
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            classes,
            enrollments,
        }
    }

    /// Self-enrollment. The (user, class) primary key decides concurrent
    /// attempts: exactly one insert wins, the rest see `AlreadyEnrolled`.
    pub async fn enroll(&self, user_id: UserId, class_id: ClassId) -> Result<()> {
        match self.enrollments.insert_active(user_id, class_id).await {
            Ok(_) => {
                info!(%user_id, %class_id, "user enrolled");
                Ok(())
            }
            Err(err) => {
                warn!(%user_id, %class_id, error = %err, "enrollment rejected");
                Err(err)
            }
        }
    }

    pub async fn add_student(
        &self,
        teacher_id: UserId,
        class_id: ClassId,
        student_id: UserId,
    ) -> Result<EnrollmentRecord> {
        ensure_owned(self.classes.as_ref(), teacher_id, class_id).await?;

        if self.enrollments.find(student_id, class_id).await?.is_some() {
            warn!(%student_id, %class_id, "student is already enrolled");
            return Err(AppError::AlreadyEnrolled);
        }

        // The class was just confirmed, so a dangling reference here is the
        // student.
        let enrollment = self
            .enrollments
            .insert_active(student_id, class_id)
            .await
            .map_err(|err| match err {
                AppError::ClassNotFound => AppError::NotFound("Student".to_string()),
                other => other,
            })?;

        info!(%teacher_id, %student_id, %class_id, "student added to class");
        Ok(enrollment)
    }

    /// Not enrolled and not-your-class are reported identically.
    pub async fn remove_student(
        &self,
        teacher_id: UserId,
        class_id: ClassId,
        student_id: UserId,
    ) -> Result<()> {
        if !self
            .enrollments
            .delete_owned(teacher_id, class_id, student_id)
            .await?
        {
            warn!(%teacher_id, %student_id, %class_id, "student removal matched no row");
            return Err(AppError::NotFoundOrUnauthorized(STUDENT_NOT_REMOVABLE));
        }

        info!(%teacher_id, %student_id, %class_id, "student removed from class");
        Ok(())
    }

    pub async fn roster(
        &self,
        teacher_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<EnrolledUserRecord>> {
        ensure_owned(self.classes.as_ref(), teacher_id, class_id).await?;
        self.enrollments
            .list_enrolled_owned(teacher_id, class_id)
            .await
    }

    pub async fn not_enrolled(
        &self,
        teacher_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<UserRecord>> {
        ensure_owned(self.classes.as_ref(), teacher_id, class_id).await?;
        self.enrollments
            .list_not_enrolled_owned(teacher_id, class_id)
            .await
    }
}
