use std::sync::Arc;

use classroom_core::domain::{ClassId, MaterialId, UserId};
use tracing::info;

use crate::error::{AppError, Result};
use crate::repository::{MaterialRecord, ModuleRecord, NewModule, SyllabusRepository};

use super::CLASS_NOT_OWNED;

pub struct SyllabusService {
    syllabus: Arc<dyn SyllabusRepository>,
}

impl SyllabusService {
    pub fn new(syllabus: Arc<dyn SyllabusRepository>) -> Self {
        Self { syllabus }
    }

    pub async fn create_material(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        title: String,
    ) -> Result<MaterialRecord> {
        let material = self
            .syllabus
            .create_material_owned(owner_id, class_id, title)
            .await?
            .ok_or(AppError::NotFoundOrUnauthorized(CLASS_NOT_OWNED))?;

        info!(%class_id, material_id = %material.id, "material created");
        Ok(material)
    }

    pub async fn create_module(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        new_module: NewModule,
    ) -> Result<ModuleRecord> {
        let module = self
            .syllabus
            .create_module_owned(owner_id, class_id, material_id, new_module)
            .await?
            .ok_or(AppError::NotFoundOrUnauthorized(
                "Material not found or unauthorized access",
            ))?;

        info!(%class_id, %material_id, module_id = %module.id, "module created");
        Ok(module)
    }
}
