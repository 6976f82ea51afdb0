mod class_service;
mod coursework_service;
mod enrollment_manager;
mod overview_composer;
mod progress_tracker;
mod syllabus_service;

pub use class_service::ClassService;
pub use coursework_service::{AssignmentDetails, AssignmentReview, CourseworkService};
pub use enrollment_manager::EnrollmentManager;
pub use overview_composer::{ClassListing, ClassOverview, OverviewComposer};
pub use progress_tracker::{ProgressTracker, TrackedModule};
pub use syllabus_service::SyllabusService;

use classroom_core::domain::{ClassId, UserId};

use crate::error::{AppError, Result};
use crate::repository::{ClassRecord, ClassRepository};

pub(crate) const CLASS_NOT_OWNED: &str = "Class not found or unauthorized access";

/// Read-side ownership check for owner-only listings. Writes never use it:
/// they carry the owner in their own WHERE clause.
pub(crate) async fn ensure_owned(
    classes: &dyn ClassRepository,
    owner_id: UserId,
    class_id: ClassId,
) -> Result<ClassRecord> {
    match classes.find_by_id(class_id).await? {
        Some(class) if class.owner_id == owner_id => Ok(class),
        _ => Err(AppError::NotFoundOrUnauthorized(CLASS_NOT_OWNED)),
    }
}
