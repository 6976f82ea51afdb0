use std::sync::Arc;

use classroom_core::domain::{ClassId, UserId};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::repository::{ClassChanges, ClassRecord, ClassRepository, ClassTotals, NewClass};

use super::CLASS_NOT_OWNED;

/// Class lifecycle and visibility. Only the owning teacher may mutate a
/// class, and every mutation is a single owner-scoped statement.
pub struct ClassService {
    classes: Arc<dyn ClassRepository>,
}

impl ClassService {
    pub fn new(classes: Arc<dyn ClassRepository>) -> Self {
        Self { classes }
    }

    pub async fn create(&self, new_class: NewClass) -> Result<ClassRecord> {
        let class = self.classes.create(new_class).await?;
        info!(class_id = %class.id, owner_id = %class.owner_id, status = %class.status, "class created");
        Ok(class)
    }

    pub async fn update(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        changes: ClassChanges,
    ) -> Result<ClassRecord> {
        let class = self
            .classes
            .update_owned(owner_id, class_id, changes)
            .await?
            .ok_or_else(|| rejected("update", owner_id, class_id))?;

        info!(%class_id, %owner_id, "class updated");
        Ok(class)
    }

    pub async fn delete(&self, owner_id: UserId, class_id: ClassId) -> Result<()> {
        if !self.classes.delete_owned(owner_id, class_id).await? {
            return Err(rejected("delete", owner_id, class_id));
        }

        info!(%class_id, %owner_id, "class deleted");
        Ok(())
    }

    /// Flips `public` and `draft`. Applying it twice restores the original
    /// status.
    pub async fn toggle_visibility(&self, owner_id: UserId, class_id: ClassId) -> Result<ClassRecord> {
        let class = self
            .classes
            .toggle_visibility_owned(owner_id, class_id)
            .await?
            .ok_or_else(|| rejected("toggle visibility", owner_id, class_id))?;

        info!(%class_id, %owner_id, status = %class.status, "class visibility toggled");
        Ok(class)
    }

    pub async fn list_owned(&self, owner_id: UserId) -> Result<Vec<ClassTotals>> {
        self.classes.list_owned_with_totals(owner_id).await
    }
}

fn rejected(action: &str, owner_id: UserId, class_id: ClassId) -> AppError {
    warn!(%class_id, %owner_id, action, "class mutation matched no owned row");
    AppError::NotFoundOrUnauthorized(CLASS_NOT_OWNED)
}
