use crate::entity::{assignment, class};
use crate::error::{AppError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use classroom_core::domain::{AssignmentId, ClassId, UserId};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::{classify_insert_error, insert_select_id, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub class_id: ClassId,
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDateTime>,
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// `None` when the class does not exist or is not owned by `owner_id`.
    async fn create_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        new_assignment: NewAssignment,
    ) -> Result<Option<AssignmentRecord>>;
    async fn find_by_id(&self, assignment_id: AssignmentId) -> Result<Option<AssignmentRecord>>;
    /// Assignments of the class in id order.
    async fn list_by_class(&self, class_id: ClassId) -> Result<Vec<AssignmentRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmAssignmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: assignment::Model) -> anyhow::Result<AssignmentRecord> {
        Ok(AssignmentRecord {
            id: AssignmentId::from(model.id),
            class_id: ClassId::from(model.class_id),
            creator_id: parse_user_id(
                "assignments.creator_assignment_id",
                &model.creator_assignment_id,
            )?,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl AssignmentRepository for SeaOrmAssignmentRepository {
    async fn create_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        new_assignment: NewAssignment,
    ) -> Result<Option<AssignmentRecord>> {
        let timestamp = now();
        let owned_class = Query::select()
            .expr(Expr::val(class_id.value()))
            .expr(Expr::val(owner_id.to_string()))
            .expr(Expr::val(new_assignment.title))
            .expr(Expr::val(new_assignment.description))
            .expr(Expr::val(new_assignment.due_date))
            .expr(Expr::val(timestamp))
            .expr(Expr::val(timestamp))
            .from(class::Entity)
            .and_where(class::Column::Id.eq(class_id.value()))
            .and_where(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .to_owned();

        let insert = Query::insert()
            .into_table(assignment::Entity)
            .columns([
                assignment::Column::ClassId,
                assignment::Column::CreatorAssignmentId,
                assignment::Column::Title,
                assignment::Column::Description,
                assignment::Column::DueDate,
                assignment::Column::CreatedAt,
                assignment::Column::UpdatedAt,
            ])
            .to_owned();

        let inserted = insert_select_id(&self.db, insert, owned_class, assignment::Column::Id)
            .await
            .map_err(|err| {
                classify_insert_error(
                    err,
                    || AppError::InvalidReference("Assignment already exists".to_string()),
                    || AppError::ClassNotFound,
                )
            })?;
        let Some(id) = inserted else {
            return Ok(None);
        };

        let record = self
            .find_by_id(AssignmentId::from(id))
            .await?
            .ok_or_else(|| anyhow!("assignment {id} vanished after insert"))?;
        Ok(Some(record))
    }

    async fn find_by_id(&self, assignment_id: AssignmentId) -> Result<Option<AssignmentRecord>> {
        let model = assignment::Entity::find_by_id(assignment_id.value())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list_by_class(&self, class_id: ClassId) -> Result<Vec<AssignmentRecord>> {
        let models = assignment::Entity::find()
            .filter(assignment::Column::ClassId.eq(class_id.value()))
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }
}
