use chrono::NaiveDateTime;
use classroom_core::domain::EnrollmentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::ClassResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialResponse {
    pub id: i64,
    pub class_id: i64,
    pub creator_materials_id: Uuid,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleResponse {
    pub id: i64,
    pub materials_id: i64,
    pub title: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub videos: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialNode {
    pub id: i64,
    pub title: String,
    pub modules: Vec<ModuleNode>,
}

/// Class page: the class, the caller's standing in it, and the syllabus tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassOverviewResponse {
    #[serde(flatten)]
    pub class: ClassResponse,
    pub enrollment_status: EnrollmentStatus,
    pub progress: f64,
    pub materials: Vec<MaterialNode>,
}
