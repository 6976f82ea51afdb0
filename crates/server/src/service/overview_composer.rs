use std::collections::HashMap;
use std::sync::Arc;

use classroom_core::domain::{ClassId, EnrollmentStatus, UserId};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::repository::{
    ClassRecord, ClassRepository, EnrollmentRepository, MaterialTree, ProgressRepository,
    SyllabusRepository,
};

#[derive(Debug, Clone)]
pub struct ClassListing {
    pub class: ClassRecord,
    pub enrollment_status: EnrollmentStatus,
    pub progress: f64,
}

#[derive(Debug, Clone)]
pub struct ClassOverview {
    pub class: ClassRecord,
    pub enrollment_status: EnrollmentStatus,
    pub progress: f64,
    pub materials: Vec<MaterialTree>,
}

/// Read-only aggregate views. Reads are independent and may observe
/// slightly different moments; no transaction is taken.
pub struct OverviewComposer {
    classes: Arc<dyn ClassRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    syllabus: Arc<dyn SyllabusRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl OverviewComposer {
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        syllabus: Arc<dyn SyllabusRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            classes,
            enrollments,
            syllabus,
            progress,
        }
    }

    pub async fn overview(&self, viewer: Option<UserId>, class_id: ClassId) -> Result<ClassOverview> {
        let class = self
            .classes
            .find_by_id(class_id)
            .await?
            .ok_or(AppError::ClassNotFound)?;

        let (enrollment_status, progress, materials) = tokio::try_join!(
            self.enrollment_status(viewer, class_id),
            self.derived_progress(viewer, class_id),
            self.syllabus.tree(class_id),
        )?;

        debug!(%class_id, materials = materials.len(), "class overview composed");
        Ok(ClassOverview {
            class,
            enrollment_status,
            progress,
            materials,
        })
    }

    /// Every class in id order, annotated for `viewer` with the cached
    /// percentage. Anonymous callers see `not_enrolled` and zero progress
    /// everywhere.
    pub async fn list_classes(&self, viewer: Option<UserId>) -> Result<Vec<ClassListing>> {
        let classes = self.classes.list_all().await?;

        let (enrolled, progress) = match viewer {
            Some(user_id) => {
                let (enrollments, cached) = tokio::try_join!(
                    self.enrollments.list_by_user_id(user_id),
                    self.progress.cached_for_user(user_id),
                )?;
                let enrolled: HashMap<ClassId, EnrollmentStatus> = enrollments
                    .into_iter()
                    .map(|record| (record.class_id, record.status))
                    .collect();
                (enrolled, cached.into_iter().collect::<HashMap<_, _>>())
            }
            None => (HashMap::new(), HashMap::new()),
        };

        Ok(classes
            .into_iter()
            .map(|class| ClassListing {
                enrollment_status: enrolled
                    .get(&class.id)
                    .copied()
                    .unwrap_or(EnrollmentStatus::NotEnrolled),
                progress: progress.get(&class.id).copied().unwrap_or_default(),
                class,
            })
            .collect())
    }

    async fn enrollment_status(
        &self,
        viewer: Option<UserId>,
        class_id: ClassId,
    ) -> Result<EnrollmentStatus> {
        let Some(user_id) = viewer else {
            return Ok(EnrollmentStatus::NotEnrolled);
        };

        Ok(self
            .enrollments
            .find(user_id, class_id)
            .await?
            .map_or(EnrollmentStatus::NotEnrolled, |record| record.status))
    }

    /// Recounted from the module rows; the cached aggregate only feeds the
    /// catalog.
    async fn derived_progress(&self, viewer: Option<UserId>, class_id: ClassId) -> Result<f64> {
        let Some(user_id) = viewer else {
            return Ok(0.0);
        };

        let progress = self.progress.counts(user_id, class_id).await?;
        Ok(progress.percentage())
    }
}
