use crate::entity::{assignment, class, submission, user};
use crate::error::{AppError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use classroom_core::domain::{AssignmentId, Grade, SubmissionId, SubmissionStatus, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
};
use std::str::FromStr;
use tracing::debug;

use super::{classify_insert_error, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub link: String,
    pub status: SubmissionStatus,
    pub grade: Option<Grade>,
    pub feedback: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub graded_at: Option<NaiveDateTime>,
}

/// A submission together with the student who made it.
#[derive(Debug, Clone)]
pub struct SubmitterRecord {
    pub submission: SubmissionRecord,
    pub student_name: String,
    pub student_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct GradeSubmission {
    pub grade: Grade,
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// A second submission for the same (assignment, student) fails with
    /// `AlreadySubmitted`, a dangling assignment with `NotFound`.
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>>;
    async fn find_for_student(
        &self,
        student_id: UserId,
        submission_id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>>;
    async fn find_for_assignment(
        &self,
        student_id: UserId,
        assignment_id: AssignmentId,
    ) -> Result<Option<SubmissionRecord>>;
    /// Every submission for the assignment with its student, in id order.
    async fn list_for_assignment(&self, assignment_id: AssignmentId)
    -> Result<Vec<SubmitterRecord>>;
    /// Grades a `submitted` row whose assignment belongs to a class owned by
    /// `owner_id`. `None` when no such row exists.
    async fn grade_owned(
        &self,
        owner_id: UserId,
        submission_id: SubmissionId,
        grading: GradeSubmission,
    ) -> Result<Option<SubmissionRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: submission::Model) -> anyhow::Result<SubmissionRecord> {
        let status = SubmissionStatus::from_str(&model.status)
            .map_err(|e| anyhow!("invalid submissions.status for {} from database: {e}", model.id))?;

        let grade = model
            .grade
            .map(|raw| {
                let value = u16::try_from(raw).map_err(|_| {
                    anyhow!("invalid submissions.grade from database: {raw} (must be non-negative)")
                })?;
                Grade::new(value).map_err(anyhow::Error::from)
            })
            .transpose()?;

        Ok(SubmissionRecord {
            id: SubmissionId::from(model.id),
            assignment_id: AssignmentId::from(model.assignment_id),
            student_id: parse_user_id("submissions.student_id", &model.student_id)?,
            link: model.link,
            status,
            grade,
            feedback: model.feedback,
            submitted_at: model.submitted_at,
            graded_at: model.graded_at,
        })
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let active_model = submission::ActiveModel {
            assignment_id: Set(new_submission.assignment_id.value()),
            student_id: Set(new_submission.student_id.to_string()),
            link: Set(new_submission.link),
            status: Set(SubmissionStatus::Submitted.as_str().to_string()),
            grade: Set(None),
            feedback: Set(None),
            submitted_at: Set(now()),
            graded_at: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(|err| {
            classify_insert_error(
                err,
                || AppError::AlreadySubmitted,
                || AppError::NotFound("Assignment".to_string()),
            )
        })?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find_by_id(submission_id.value())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_for_student(
        &self,
        student_id: UserId,
        submission_id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find()
            .filter(submission::Column::Id.eq(submission_id.value()))
            .filter(submission::Column::StudentId.eq(student_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_for_assignment(
        &self,
        student_id: UserId,
        assignment_id: AssignmentId,
    ) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find()
            .filter(submission::Column::AssignmentId.eq(assignment_id.value()))
            .filter(submission::Column::StudentId.eq(student_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list_for_assignment(
        &self,
        assignment_id: AssignmentId,
    ) -> Result<Vec<SubmitterRecord>> {
        let rows = submission::Entity::find()
            .find_also_related(user::Entity)
            .filter(submission::Column::AssignmentId.eq(assignment_id.value()))
            .order_by_asc(submission::Column::Id)
            .all(&self.db)
            .await?;

        let mut submitters = Vec::with_capacity(rows.len());
        for (model, student) in rows {
            let student = student.ok_or_else(|| {
                anyhow!("submission {} has no student row", model.id)
            })?;
            submitters.push(SubmitterRecord {
                submission: Self::map_model(model)?,
                student_name: student.name,
                student_image: student.image_url,
            });
        }

        Ok(submitters)
    }

    async fn grade_owned(
        &self,
        owner_id: UserId,
        submission_id: SubmissionId,
        grading: GradeSubmission,
    ) -> Result<Option<SubmissionRecord>> {
        let owned_assignments = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::Id)
            .join(JoinType::InnerJoin, assignment::Relation::Class.def())
            .filter(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .into_query();

        let grade = i16::try_from(grading.grade.value())
            .map_err(|_| anyhow!("grade {} does not fit the grade column", grading.grade.value()))?;

        let result = submission::Entity::update_many()
            .col_expr(submission::Column::Status, Expr::value(grading.status.as_str()))
            .col_expr(submission::Column::Grade, Expr::value(Some(grade)))
            .col_expr(submission::Column::Feedback, Expr::value(grading.feedback))
            .col_expr(submission::Column::GradedAt, Expr::value(Some(now())))
            .filter(submission::Column::Id.eq(submission_id.value()))
            .filter(submission::Column::Status.eq(SubmissionStatus::Submitted.as_str()))
            .filter(submission::Column::AssignmentId.in_subquery(owned_assignments))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            debug!(%submission_id, %owner_id, "grading matched no submitted row");
            return Ok(None);
        }

        self.find_by_id(submission_id).await
    }
}
