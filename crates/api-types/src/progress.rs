use chrono::NaiveDateTime;
use classroom_core::domain::ProgressStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackModuleResponse {
    pub user_id: Uuid,
    pub class_id: i64,
    pub material_id: i64,
    pub module_id: i64,
    pub status: ProgressStatus,
    pub progress: f64,
    pub completed_modules: u64,
    pub total_modules: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub class_id: i64,
    pub progress: f64,
    pub completed_modules: u64,
    pub total_modules: u64,
}
