use crate::entity::{class, material, module};
use crate::error::{AppError, Result};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use classroom_core::domain::{ClassId, MaterialId, ModuleId, UserId};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use super::{classify_insert_error, insert_select_id, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct MaterialRecord {
    pub id: MaterialId,
    pub class_id: ClassId,
    pub creator_id: UserId,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub material_id: MaterialId,
    pub title: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub videos: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct MaterialTree {
    pub material: MaterialRecord,
    pub modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone)]
pub struct NewModule {
    pub title: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub videos: Vec<String>,
}

#[async_trait]
pub trait SyllabusRepository: Send + Sync {
    /// Materials of the class in id order, each with its modules in id order.
    async fn tree(&self, class_id: ClassId) -> Result<Vec<MaterialTree>>;
    /// `None` when the class does not exist or is not owned by `owner_id`.
    async fn create_material_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        title: String,
    ) -> Result<Option<MaterialRecord>>;
    /// `None` when the material is not part of a class owned by `owner_id`.
    async fn create_module_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        new_module: NewModule,
    ) -> Result<Option<ModuleRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSyllabusRepository {
    db: DatabaseConnection,
}

impl SeaOrmSyllabusRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_material(model: material::Model) -> anyhow::Result<MaterialRecord> {
        Ok(MaterialRecord {
            id: MaterialId::from(model.id),
            class_id: ClassId::from(model.class_id),
            creator_id: parse_user_id("materials.creator_materials_id", &model.creator_materials_id)?,
            title: model.title,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn map_module(model: module::Model) -> anyhow::Result<ModuleRecord> {
        let attachments = decode_list("modules.attachments", model.id, &model.attachments)?;
        let videos = decode_list("modules.videos", model.id, &model.videos)?;

        Ok(ModuleRecord {
            id: ModuleId::from(model.id),
            material_id: MaterialId::from(model.materials_id),
            title: model.title,
            content: model.content,
            attachments,
            videos,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn decode_list(column: &str, id: i64, raw: &str) -> anyhow::Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(raw).map_err(|e| anyhow!("invalid {column} for module {id} from database: {e}"))
}

fn encode_list(values: &[String]) -> anyhow::Result<String> {
    serde_json::to_string(values).context("failed to encode module references")
}

#[async_trait]
impl SyllabusRepository for SeaOrmSyllabusRepository {
    async fn tree(&self, class_id: ClassId) -> Result<Vec<MaterialTree>> {
        let materials = material::Entity::find()
            .filter(material::Column::ClassId.eq(class_id.value()))
            .order_by_asc(material::Column::Id)
            .all(&self.db)
            .await?;

        if materials.is_empty() {
            return Ok(Vec::new());
        }

        let material_ids: Vec<i64> = materials.iter().map(|m| m.id).collect();
        let modules = module::Entity::find()
            .filter(module::Column::MaterialsId.is_in(material_ids))
            .order_by_asc(module::Column::Id)
            .all(&self.db)
            .await?;

        let mut by_material: HashMap<i64, Vec<ModuleRecord>> = HashMap::new();
        for model in modules {
            let material_id = model.materials_id;
            by_material
                .entry(material_id)
                .or_default()
                .push(Self::map_module(model)?);
        }

        let mut tree = Vec::with_capacity(materials.len());
        for model in materials {
            let modules = by_material.remove(&model.id).unwrap_or_default();
            tree.push(MaterialTree {
                material: Self::map_material(model)?,
                modules,
            });
        }

        Ok(tree)
    }

    async fn create_material_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        title: String,
    ) -> Result<Option<MaterialRecord>> {
        let timestamp = now();
        let owned_class = Query::select()
            .expr(Expr::val(class_id.value()))
            .expr(Expr::val(owner_id.to_string()))
            .expr(Expr::val(title))
            .expr(Expr::val(timestamp))
            .expr(Expr::val(timestamp))
            .from(class::Entity)
            .and_where(class::Column::Id.eq(class_id.value()))
            .and_where(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .to_owned();

        let insert = Query::insert()
            .into_table(material::Entity)
            .columns([
                material::Column::ClassId,
                material::Column::CreatorMaterialsId,
                material::Column::Title,
                material::Column::CreatedAt,
                material::Column::UpdatedAt,
            ])
            .to_owned();

        let inserted = insert_select_id(&self.db, insert, owned_class, material::Column::Id)
            .await
            .map_err(|err| {
                classify_insert_error(
                    err,
                    || AppError::InvalidReference("Material already exists".to_string()),
                    || AppError::ClassNotFound,
                )
            })?;
        let Some(id) = inserted else {
            return Ok(None);
        };

        let model = material::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("material {id} vanished after insert"))?;
        Ok(Some(Self::map_material(model)?))
    }

    async fn create_module_owned(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        new_module: NewModule,
    ) -> Result<Option<ModuleRecord>> {
        let timestamp = now();
        let owned_material = Query::select()
            .expr(Expr::val(material_id.value()))
            .expr(Expr::val(new_module.title))
            .expr(Expr::val(new_module.content))
            .expr(Expr::val(encode_list(&new_module.attachments)?))
            .expr(Expr::val(encode_list(&new_module.videos)?))
            .expr(Expr::val(timestamp))
            .expr(Expr::val(timestamp))
            .from(material::Entity)
            .inner_join(
                class::Entity,
                Expr::col((class::Entity, class::Column::Id))
                    .equals((material::Entity, material::Column::ClassId)),
            )
            .and_where(material::Column::Id.eq(material_id.value()))
            .and_where(material::Column::ClassId.eq(class_id.value()))
            .and_where(class::Column::CreatorClassId.eq(owner_id.to_string()))
            .to_owned();

        let insert = Query::insert()
            .into_table(module::Entity)
            .columns([
                module::Column::MaterialsId,
                module::Column::Title,
                module::Column::Content,
                module::Column::Attachments,
                module::Column::Videos,
                module::Column::CreatedAt,
                module::Column::UpdatedAt,
            ])
            .to_owned();

        let inserted = insert_select_id(&self.db, insert, owned_material, module::Column::Id)
            .await
            .map_err(|err| {
                classify_insert_error(
                    err,
                    || AppError::InvalidReference("Module already exists".to_string()),
                    || AppError::NotFound("Material".to_string()),
                )
            })?;
        let Some(id) = inserted else {
            return Ok(None);
        };

        let model = module::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("module {id} vanished after insert"))?;
        Ok(Some(Self::map_module(model)?))
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_list, encode_list};

    #[test]
    fn reference_lists_keep_their_order() {
        let values = vec!["b.pdf".to_string(), "a.pdf".to_string()];
        let raw = encode_list(&values).expect("list should encode");

        assert_eq!(raw, r#"["b.pdf","a.pdf"]"#);
        assert_eq!(decode_list("modules.attachments", 1, &raw).expect("decodes"), values);
    }

    #[test]
    fn blank_column_reads_as_empty_list() {
        assert!(decode_list("modules.videos", 1, "").expect("decodes").is_empty());
        assert!(decode_list("modules.videos", 1, "{").is_err());
    }
}
