use std::sync::Arc;

use classroom_core::domain::{ClassId, MaterialId, ModuleId, Progress, UserId};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::repository::{ClassRepository, ProgressRecord, ProgressRepository};

#[derive(Debug, Clone)]
pub struct TrackedModule {
    pub record: ProgressRecord,
    pub progress: Progress,
}

impl TrackedModule {
    pub fn percentage(&self) -> f64 {
        self.progress.percentage()
    }
}

/// Records module completions and keeps the per-class percentage derived
/// from them.
///
/// Tracking runs in sequence: upsert the module row, refresh the cached
/// aggregate (recounted inside its own upsert), count for the response. The
/// module rows are authoritative; a failed refresh leaves the cached
/// percentage stale until the next tracking call for the same class succeeds.
pub struct ProgressTracker {
    classes: Arc<dyn ClassRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressTracker {
    pub fn new(classes: Arc<dyn ClassRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { classes, progress }
    }

    pub async fn track(
        &self,
        user_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<TrackedModule> {
        if !self
            .progress
            .module_in_class(class_id, material_id, module_id)
            .await?
        {
            warn!(%user_id, %class_id, %material_id, %module_id, "module is not part of the class");
            return Err(AppError::InvalidReference(
                "Invalid class ID, material ID, module ID, or user ID".to_string(),
            ));
        }

        let record = self
            .progress
            .mark_done(user_id, class_id, material_id, module_id)
            .await?;

        let progress = match self.recompute(user_id, class_id).await {
            Ok(progress) => progress,
            Err(err) => {
                warn!(
                    %user_id,
                    %class_id,
                    error = %err,
                    "module marked done but cached progress is stale"
                );
                return Err(err);
            }
        };

        info!(
            %user_id,
            %class_id,
            %module_id,
            completed = progress.completed(),
            total = progress.total(),
            percentage = progress.percentage(),
            "module completion tracked"
        );

        Ok(TrackedModule { record, progress })
    }

    /// Counts from the module rows, never from the cache.
    pub async fn compute(&self, user_id: UserId, class_id: ClassId) -> Result<Progress> {
        self.progress.counts(user_id, class_id).await
    }

    pub async fn report(&self, user_id: UserId, class_id: ClassId) -> Result<Progress> {
        if self.classes.find_by_id(class_id).await?.is_none() {
            return Err(AppError::ClassNotFound);
        }

        self.compute(user_id, class_id).await
    }

    async fn recompute(&self, user_id: UserId, class_id: ClassId) -> Result<Progress> {
        self.progress.refresh_cached(user_id, class_id).await?;
        self.compute(user_id, class_id).await
    }
}
