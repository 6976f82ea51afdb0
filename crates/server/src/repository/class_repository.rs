use crate::entity::{class, enrollment, material, module};
use crate::error::{AppError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use classroom_core::domain::{ClassId, ClassStatus, UserId};
use sea_orm::sea_query::{CaseStatement, Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use super::{classify_insert_error, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct ClassRecord {
    pub id: ClassId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub status: ClassStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub status: ClassStatus,
}

#[derive(Debug, Clone)]
pub struct ClassChanges {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub status: ClassStatus,
}

#[derive(Debug, Clone)]
pub struct ClassTotals {
    pub class: ClassRecord,
    pub materials_total: u64,
    pub modules_total: u64,
    pub student_enrolled_total: u64,
}

/// Every `*_owned` write carries the owner in its WHERE clause, so `None` /
/// `false` covers both a missing class and someone else's class.
#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, new_class: NewClass) -> Result<ClassRecord>;
    async fn find_by_id(&self, class_id: ClassId) -> Result<Option<ClassRecord>>;
    async fn list_all(&self) -> Result<Vec<ClassRecord>>;
    async fn list_owned_with_totals(&self, owner_id: UserId) -> Result<Vec<ClassTotals>>;
    async fn update_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        changes: ClassChanges,
    ) -> Result<Option<ClassRecord>>;
    async fn delete_owned(&self, owner_id: UserId, class_id: ClassId) -> Result<bool>;
    async fn toggle_visibility_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Option<ClassRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmClassRepository {
    db: DatabaseConnection,
}

impl SeaOrmClassRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: class::Model) -> anyhow::Result<ClassRecord> {
        let status = ClassStatus::from_str(&model.status)
            .map_err(|e| anyhow!("invalid class.status from database: {e}"))?;

        Ok(ClassRecord {
            id: ClassId::from(model.id),
            owner_id: parse_user_id("class.creator_class_id", &model.creator_class_id)?,
            title: model.title,
            description: model.description,
            image: model.image,
            video: model.video,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    /// `CASE status WHEN 'public' THEN 'draft' WHEN 'draft' THEN 'public' ELSE status END`
    fn toggled_status() -> SimpleExpr {
        [ClassStatus::Public, ClassStatus::Draft]
            .into_iter()
            .fold(CaseStatement::new(), |case, status| {
                case.case(
                    Expr::col(class::Column::Status).eq(status.as_str()),
                    status.toggled().as_str(),
                )
            })
            .finally(Expr::col(class::Column::Status))
            .into()
    }

    async fn count_by_class(
        &self,
        class_ids: &[i64],
    ) -> Result<(HashMap<i64, i64>, HashMap<i64, i64>, HashMap<i64, i64>)> {
        let materials: Vec<(i64, i64)> = material::Entity::find()
            .select_only()
            .column(material::Column::ClassId)
            .column_as(
                Expr::col((material::Entity, material::Column::Id)).count(),
                "total",
            )
            .filter(material::Column::ClassId.is_in(class_ids.to_vec()))
            .group_by(material::Column::ClassId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let modules: Vec<(i64, i64)> = module::Entity::find()
            .select_only()
            .column(material::Column::ClassId)
            .column_as(
                Expr::col((module::Entity, module::Column::Id)).count(),
                "total",
            )
            .join(JoinType::InnerJoin, module::Relation::Material.def())
            .filter(material::Column::ClassId.is_in(class_ids.to_vec()))
            .group_by(material::Column::ClassId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let students: Vec<(i64, i64)> = enrollment::Entity::find()
            .select_only()
            .column(enrollment::Column::ClassId)
            .column_as(
                Expr::col((enrollment::Entity, enrollment::Column::UserId)).count(),
                "total",
            )
            .filter(enrollment::Column::ClassId.is_in(class_ids.to_vec()))
            .group_by(enrollment::Column::ClassId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok((
            materials.into_iter().collect(),
            modules.into_iter().collect(),
            students.into_iter().collect(),
        ))
    }
}

fn count_of(counts: &HashMap<i64, i64>, class_id: i64) -> u64 {
    counts
        .get(&class_id)
        .copied()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or_default()
}

#[async_trait]
impl ClassRepository for SeaOrmClassRepository {
    async fn create(&self, new_class: NewClass) -> Result<ClassRecord> {
        let timestamp = now();
        let active_model = class::ActiveModel {
            creator_class_id: Set(new_class.owner_id.to_string()),
            title: Set(new_class.title),
            description: Set(new_class.description),
            image: Set(new_class.image),
            video: Set(new_class.video),
            status: Set(new_class.status.as_str().to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(|err| {
            classify_insert_error(
                err,
                || AppError::InvalidReference("Class already exists".to_string()),
                || AppError::InvalidReference("Creator id not found".to_string()),
            )
        })?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, class_id: ClassId) -> Result<Option<ClassRecord>> {
        let model = class::Entity::find_by_id(class_id.value())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list_all(&self) -> Result<Vec<ClassRecord>> {
        let models = class::Entity::find()
            .order_by_asc(class::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list_owned_with_totals(&self, owner_id: UserId) -> Result<Vec<ClassTotals>> {
        let models = class::Entity::find()
            .filter(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .order_by_asc(class::Column::Id)
            .all(&self.db)
            .await?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let (materials, modules, students) = self.count_by_class(&class_ids).await?;

        let mut totals = Vec::with_capacity(models.len());
        for model in models {
            let id = model.id;
            totals.push(ClassTotals {
                class: Self::map_model(model)?,
                materials_total: count_of(&materials, id),
                modules_total: count_of(&modules, id),
                student_enrolled_total: count_of(&students, id),
            });
        }

        Ok(totals)
    }

    async fn update_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        changes: ClassChanges,
    ) -> Result<Option<ClassRecord>> {
        let result = class::Entity::update_many()
            .col_expr(class::Column::Title, Expr::value(changes.title))
            .col_expr(class::Column::Description, Expr::value(changes.description))
            .col_expr(class::Column::Image, Expr::value(changes.image))
            .col_expr(class::Column::Video, Expr::value(changes.video))
            .col_expr(class::Column::Status, Expr::value(changes.status.as_str()))
            .col_expr(class::Column::UpdatedAt, Expr::value(now()))
            .filter(class::Column::Id.eq(class_id.value()))
            .filter(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            debug!(%class_id, %owner_id, "class update matched no owned row");
            return Ok(None);
        }

        self.find_by_id(class_id).await
    }

    async fn delete_owned(&self, owner_id: UserId, class_id: ClassId) -> Result<bool> {
        let result = class::Entity::delete_many()
            .filter(class::Column::Id.eq(class_id.value()))
            .filter(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn toggle_visibility_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
    ) -> Result<Option<ClassRecord>> {
        let result = class::Entity::update_many()
            .col_expr(class::Column::Status, Self::toggled_status())
            .col_expr(class::Column::UpdatedAt, Expr::value(now()))
            .filter(class::Column::Id.eq(class_id.value()))
            .filter(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(class_id).await
    }
}
