use crate::entity::{class, class_progress, material, module, progress};
use crate::error::{AppError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use classroom_core::domain::{ClassId, MaterialId, ModuleId, Progress, ProgressStatus, UserId};
use sea_orm::sea_query::{Expr, OnConflict, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait,
};
use std::str::FromStr;

use super::{classify_insert_error, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub class_id: ClassId,
    pub material_id: MaterialId,
    pub module_id: ModuleId,
    pub status: ProgressStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// True when `module_id` hangs off `material_id` and that material
    /// belongs to `class_id`.
    async fn module_in_class(
        &self,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<bool>;
    /// Upserts the `done` row for (user, class, module) and reads it back.
    async fn mark_done(
        &self,
        user_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<ProgressRecord>;
    async fn counts(&self, user_id: UserId, class_id: ClassId) -> Result<Progress>;
    /// Recounts the module rows and upserts the cached percentage in a single
    /// statement. Concurrent refreshes for the same pair never leave behind a
    /// value older than the rows the last statement saw.
    async fn refresh_cached(&self, user_id: UserId, class_id: ClassId) -> Result<()>;
    async fn cached_for_user(&self, user_id: UserId) -> Result<Vec<(ClassId, f64)>>;
}

#[derive(Clone)]
pub struct SeaOrmProgressRepository {
    db: DatabaseConnection,
}

impl SeaOrmProgressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: progress::Model) -> anyhow::Result<ProgressRecord> {
        let status = ProgressStatus::from_str(&model.status)
            .map_err(|e| anyhow!("invalid users_progress.status from database: {e}"))?;

        Ok(ProgressRecord {
            user_id: parse_user_id("users_progress.user_id", &model.user_id)?,
            class_id: ClassId::from(model.class_id),
            material_id: MaterialId::from(model.material_id),
            module_id: ModuleId::from(model.module_id),
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn count_of(select: SelectStatement) -> SimpleExpr {
        SimpleExpr::SubQuery(None, Box::new(select.into_sub_query_statement()))
    }

    /// `completed * 1.0 / total * 100`, or `0` without modules, evaluated by
    /// the database over the same joins as [`ProgressRepository::counts`].
    fn percentage_expr(user_id: UserId, class_id: ClassId) -> SimpleExpr {
        let total = Self::count_of(
            Query::select()
                .expr(Expr::col((module::Entity, module::Column::Id)).count())
                .from(module::Entity)
                .inner_join(
                    material::Entity,
                    Expr::col((material::Entity, material::Column::Id))
                        .equals((module::Entity, module::Column::MaterialsId)),
                )
                .and_where(material::Column::ClassId.eq(class_id.value()))
                .to_owned(),
        );

        let completed = Self::count_of(
            Query::select()
                .expr(Expr::col((progress::Entity, progress::Column::ModuleId)).count())
                .from(progress::Entity)
                .inner_join(
                    module::Entity,
                    Expr::col((module::Entity, module::Column::Id))
                        .equals((progress::Entity, progress::Column::ModuleId)),
                )
                .inner_join(
                    material::Entity,
                    Expr::col((material::Entity, material::Column::Id))
                        .equals((module::Entity, module::Column::MaterialsId)),
                )
                .and_where(progress::Column::UserId.eq(user_id.to_string()))
                .and_where(progress::Column::ClassId.eq(class_id.value()))
                .and_where(progress::Column::Status.eq(ProgressStatus::Done.as_str()))
                .and_where(material::Column::ClassId.eq(class_id.value()))
                .to_owned(),
        );

        Expr::case(total.clone().eq(0), 0.0_f64)
            .finally(completed.mul(1.0_f64).div(total).mul(100.0_f64))
            .into()
    }
}

#[async_trait]
impl ProgressRepository for SeaOrmProgressRepository {
    async fn module_in_class(
        &self,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<bool> {
        let matches = module::Entity::find()
            .join(JoinType::InnerJoin, module::Relation::Material.def())
            .filter(module::Column::Id.eq(module_id.value()))
            .filter(module::Column::MaterialsId.eq(material_id.value()))
            .filter(material::Column::ClassId.eq(class_id.value()))
            .count(&self.db)
            .await?;

        Ok(matches > 0)
    }

    async fn mark_done(
        &self,
        user_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<ProgressRecord> {
        let timestamp = now();
        let active_model = progress::ActiveModel {
            user_id: Set(user_id.to_string()),
            class_id: Set(class_id.value()),
            material_id: Set(material_id.value()),
            module_id: Set(module_id.value()),
            status: Set(ProgressStatus::Done.as_str().to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        progress::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    progress::Column::UserId,
                    progress::Column::ClassId,
                    progress::Column::ModuleId,
                ])
                .update_columns([
                    progress::Column::MaterialId,
                    progress::Column::Status,
                    progress::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|err| {
                classify_insert_error(err, invalid_reference, invalid_reference)
            })?;

        let model = progress::Entity::find_by_id((
            user_id.to_string(),
            class_id.value(),
            module_id.value(),
        ))
        .one(&self.db)
        .await?
        .ok_or_else(|| anyhow!("progress row for module {module_id} vanished after upsert"))?;

        Ok(Self::map_model(model)?)
    }

    async fn counts(&self, user_id: UserId, class_id: ClassId) -> Result<Progress> {
        let total = module::Entity::find()
            .join(JoinType::InnerJoin, module::Relation::Material.def())
            .filter(material::Column::ClassId.eq(class_id.value()))
            .count(&self.db)
            .await?;

        // The primary key makes each (user, class, module) row unique, so
        // counting rows counts distinct modules.
        let completed = progress::Entity::find()
            .join(JoinType::InnerJoin, progress::Relation::Module.def())
            .join(JoinType::InnerJoin, module::Relation::Material.def())
            .filter(progress::Column::UserId.eq(user_id.to_string()))
            .filter(progress::Column::ClassId.eq(class_id.value()))
            .filter(progress::Column::Status.eq(ProgressStatus::Done.as_str()))
            .filter(material::Column::ClassId.eq(class_id.value()))
            .count(&self.db)
            .await?;

        Ok(Progress::new(completed, total)?)
    }

    async fn refresh_cached(&self, user_id: UserId, class_id: ClassId) -> Result<()> {
        let timestamp = now();
        let row = Query::select()
            .expr(Expr::val(user_id.to_string()))
            .expr(Expr::val(class_id.value()))
            .expr(Self::percentage_expr(user_id, class_id))
            .expr(Expr::val(timestamp))
            .expr(Expr::val(timestamp))
            .from(class::Entity)
            .and_where(class::Column::Id.eq(class_id.value()))
            .to_owned();

        let mut upsert = Query::insert();
        upsert
            .into_table(class_progress::Entity)
            .columns([
                class_progress::Column::UserId,
                class_progress::Column::ClassId,
                class_progress::Column::Progress,
                class_progress::Column::CreatedAt,
                class_progress::Column::UpdatedAt,
            ])
            .select_from(row)
            .map_err(|e| anyhow!("malformed progress upsert: {e}"))?
            .on_conflict(
                OnConflict::columns([
                    class_progress::Column::UserId,
                    class_progress::Column::ClassId,
                ])
                .update_columns([
                    class_progress::Column::Progress,
                    class_progress::Column::UpdatedAt,
                ])
                .to_owned(),
            );

        let backend = self.db.get_database_backend();
        self.db
            .execute(backend.build(&upsert))
            .await
            .map_err(|err| {
                classify_insert_error(err, invalid_reference, invalid_reference)
            })?;

        Ok(())
    }

    async fn cached_for_user(&self, user_id: UserId) -> Result<Vec<(ClassId, f64)>> {
        let rows: Vec<(i64, f64)> = class_progress::Entity::find()
            .select_only()
            .column(class_progress::Column::ClassId)
            .column(class_progress::Column::Progress)
            .filter(class_progress::Column::UserId.eq(user_id.to_string()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(class_id, percentage)| (ClassId::from(class_id), percentage))
            .collect())
    }
}

fn invalid_reference() -> AppError {
    AppError::InvalidReference(
        "Invalid class ID, material ID, module ID, or user ID".to_string(),
    )
}
