use std::sync::Arc;

use classroom_core::domain::{AssignmentId, ClassId, SubmissionId, SubmissionStatus, UserId};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::repository::{
    AssignmentRecord, AssignmentRepository, ClassRepository, GradeSubmission, NewAssignment,
    NewSubmission, SubmissionRecord, SubmissionRepository, SubmitterRecord,
};

use super::{CLASS_NOT_OWNED, ensure_owned};

const SUBMISSION_NOT_GRADABLE: &str =
    "Submission not found, already graded, or unauthorized access";
const ASSIGNMENT_NOT_OWNED: &str = "Assignment not found or unauthorized access";

/// An assignment as a student sees it, with their own submission if any.
#[derive(Debug, Clone)]
pub struct AssignmentDetails {
    pub assignment: AssignmentRecord,
    pub submission: Option<SubmissionRecord>,
}

/// An assignment as its class owner sees it, with every submission.
#[derive(Debug, Clone)]
pub struct AssignmentReview {
    pub assignment: AssignmentRecord,
    pub submissions: Vec<SubmitterRecord>,
}

/// Assignments, student submissions and one-shot grading.
pub struct CourseworkService {
    classes: Arc<dyn ClassRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl CourseworkService {
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            classes,
            assignments,
            submissions,
        }
    }

    pub async fn create_assignment(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        new_assignment: NewAssignment,
    ) -> Result<AssignmentRecord> {
        let assignment = self
            .assignments
            .create_owned(owner_id, class_id, new_assignment)
            .await?
            .ok_or(AppError::NotFoundOrUnauthorized(CLASS_NOT_OWNED))?;

        info!(%class_id, assignment_id = %assignment.id, "assignment created");
        Ok(assignment)
    }

    pub async fn class_assignments(&self, class_id: ClassId) -> Result<Vec<AssignmentRecord>> {
        if self.classes.find_by_id(class_id).await?.is_none() {
            return Err(AppError::ClassNotFound);
        }

        self.assignments.list_by_class(class_id).await
    }

    pub async fn assignment_details(
        &self,
        student_id: UserId,
        assignment_id: AssignmentId,
    ) -> Result<AssignmentDetails> {
        let (assignment, submission) = tokio::try_join!(
            self.assignments.find_by_id(assignment_id),
            self.submissions.find_for_assignment(student_id, assignment_id),
        )?;
        let assignment = assignment.ok_or_else(|| AppError::NotFound("Assignment".to_string()))?;

        Ok(AssignmentDetails {
            assignment,
            submission,
        })
    }

    pub async fn owned_class_assignments(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<AssignmentRecord>> {
        ensure_owned(self.classes.as_ref(), owner_id, class_id).await?;
        self.assignments.list_by_class(class_id).await
    }

    pub async fn review_assignment(
        &self,
        owner_id: UserId,
        assignment_id: AssignmentId,
    ) -> Result<AssignmentReview> {
        let assignment = self
            .assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or(AppError::NotFoundOrUnauthorized(ASSIGNMENT_NOT_OWNED))?;

        let owned = self
            .classes
            .find_by_id(assignment.class_id)
            .await?
            .is_some_and(|class| class.owner_id == owner_id);
        if !owned {
            warn!(%owner_id, %assignment_id, "assignment review outside owned classes");
            return Err(AppError::NotFoundOrUnauthorized(ASSIGNMENT_NOT_OWNED));
        }

        let submissions = self.submissions.list_for_assignment(assignment_id).await?;
        Ok(AssignmentReview {
            assignment,
            submissions,
        })
    }

    pub async fn submit(
        &self,
        student_id: UserId,
        assignment_id: AssignmentId,
        link: String,
    ) -> Result<SubmissionRecord> {
        if self.assignments.find_by_id(assignment_id).await?.is_none() {
            return Err(AppError::NotFound("Assignment".to_string()));
        }

        let submission = self
            .submissions
            .create(NewSubmission {
                assignment_id,
                student_id,
                link,
            })
            .await
            .inspect_err(|err| warn!(%student_id, %assignment_id, error = %err, "submission rejected"))?;

        info!(%student_id, %assignment_id, submission_id = %submission.id, "assignment submitted");
        Ok(submission)
    }

    /// Students only ever see their own submissions.
    pub async fn submission(
        &self,
        student_id: UserId,
        submission_id: SubmissionId,
    ) -> Result<SubmissionRecord> {
        self.submissions
            .find_for_student(student_id, submission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission".to_string()))
    }

    pub async fn grade(
        &self,
        teacher_id: UserId,
        submission_id: SubmissionId,
        grading: GradeSubmission,
    ) -> Result<SubmissionRecord> {
        if !grading.status.is_graded() {
            return Err(AppError::validation(
                "status",
                format!(
                    "status must be '{}' or '{}'",
                    SubmissionStatus::Graded,
                    SubmissionStatus::Revision
                ),
            ));
        }

        let submission = self
            .submissions
            .grade_owned(teacher_id, submission_id, grading)
            .await?
            .ok_or_else(|| {
                warn!(%teacher_id, %submission_id, "grading matched no submitted row");
                AppError::NotFoundOrUnauthorized(SUBMISSION_NOT_GRADABLE)
            })?;

        info!(%teacher_id, %submission_id, status = %submission.status, "submission graded");
        Ok(submission)
    }
}
