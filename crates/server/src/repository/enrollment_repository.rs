use crate::entity::{class, enrollment, user};
use crate::error::{AppError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use classroom_core::domain::{ClassId, EnrollmentStatus, UserId};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
};
use std::str::FromStr;

use super::{SeaOrmUserRepository, UserRecord, classify_insert_error, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub user_id: UserId,
    pub class_id: ClassId,
    pub status: EnrollmentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct EnrolledUserRecord {
    pub user_id: UserId,
    pub name: String,
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find(&self, user_id: UserId, class_id: ClassId) -> Result<Option<EnrollmentRecord>>;
    async fn list_by_user_id(&self, user_id: UserId) -> Result<Vec<EnrollmentRecord>>;
    /// Inserts an active enrollment. A duplicate pair fails with
    /// `AlreadyEnrolled`, a dangling class or user with `ClassNotFound`.
    async fn insert_active(&self, user_id: UserId, class_id: ClassId) -> Result<EnrollmentRecord>;
    /// Deletes the enrollment only when `owner_id` owns the class.
    async fn delete_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        student_id: UserId,
    ) -> Result<bool>;
    async fn list_enrolled_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<EnrolledUserRecord>>;
    async fn list_not_enrolled_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<UserRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmEnrollmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmEnrollmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: enrollment::Model) -> anyhow::Result<EnrollmentRecord> {
        let status = EnrollmentStatus::from_str(&model.enrollment_status)
            .map_err(|e| anyhow!("invalid users_classes.enrollment_status from database: {e}"))?;

        Ok(EnrollmentRecord {
            user_id: parse_user_id("users_classes.user_id", &model.user_id)?,
            class_id: ClassId::from(model.class_id),
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    /// `EXISTS (SELECT id FROM class WHERE id = ? AND creator_class_id = ?)`
    fn owned_class_exists(owner_id: UserId, class_id: ClassId) -> sea_orm::sea_query::SimpleExpr {
        Expr::exists(
            Query::select()
                .column(class::Column::Id)
                .from(class::Entity)
                .and_where(class::Column::Id.eq(class_id.value()))
                .and_where(class::Column::CreatorClassId.eq(owner_id.to_string()))
                .to_owned(),
        )
    }
}

#[async_trait]
impl EnrollmentRepository for SeaOrmEnrollmentRepository {
    async fn find(&self, user_id: UserId, class_id: ClassId) -> Result<Option<EnrollmentRecord>> {
        let model = enrollment::Entity::find_by_id((user_id.to_string(), class_id.value()))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list_by_user_id(&self, user_id: UserId) -> Result<Vec<EnrollmentRecord>> {
        let models = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id.to_string()))
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn insert_active(&self, user_id: UserId, class_id: ClassId) -> Result<EnrollmentRecord> {
        let timestamp = now();
        let active_model = enrollment::ActiveModel {
            user_id: Set(user_id.to_string()),
            class_id: Set(class_id.value()),
            enrollment_status: Set(EnrollmentStatus::Active.as_str().to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        let model = active_model.insert(&self.db).await.map_err(|err| {
            classify_insert_error(err, || AppError::AlreadyEnrolled, || AppError::ClassNotFound)
        })?;
        Ok(Self::map_model(model)?)
    }

    async fn delete_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        student_id: UserId,
    ) -> Result<bool> {
        let result = enrollment::Entity::delete_many()
            .filter(enrollment::Column::ClassId.eq(class_id.value()))
            .filter(enrollment::Column::UserId.eq(student_id.to_string()))
            .filter(Self::owned_class_exists(owner_id, class_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_enrolled_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<EnrolledUserRecord>> {
        let rows: Vec<(String, String)> = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Name)
            .join(JoinType::InnerJoin, user::Relation::Enrollment.def())
            .join(JoinType::InnerJoin, enrollment::Relation::Class.def())
            .filter(enrollment::Column::ClassId.eq(class_id.value()))
            .filter(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .order_by_asc(user::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for (id, name) in rows {
            users.push(EnrolledUserRecord {
                user_id: parse_user_id("users.id", &id)?,
                name,
            });
        }

        Ok(users)
    }

    async fn list_not_enrolled_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Vec<UserRecord>> {
        let enrolled = enrollment::Entity::find()
            .select_only()
            .column(enrollment::Column::UserId)
            .filter(enrollment::Column::ClassId.eq(class_id.value()))
            .into_query();

        let models = user::Entity::find()
            .filter(user::Column::Id.not_in_subquery(enrolled))
            .filter(user::Column::Id.ne(owner_id.to_string()))
            .filter(Self::owned_class_exists(owner_id, class_id))
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(SeaOrmUserRepository::map_model)
            .collect::<anyhow::Result<_>>()?)
    }
}
