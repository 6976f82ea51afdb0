mod class_status;
mod enrollment_status;
mod error;
mod grade;
mod ids;
mod progress;
mod role;
mod submission_status;

pub use class_status::ClassStatus;
pub use enrollment_status::EnrollmentStatus;
pub use error::DomainError;
pub use grade::Grade;
pub use ids::{AssignmentId, ClassId, MaterialId, ModuleId, SubmissionId, UserId};
pub use progress::{Progress, ProgressStatus};
pub use role::Role;
pub use submission_status::SubmissionStatus;
