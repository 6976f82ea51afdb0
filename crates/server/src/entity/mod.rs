pub mod assignment;
pub mod class;
pub mod class_progress;
pub mod enrollment;
pub mod material;
pub mod module;
pub mod progress;
pub mod submission;
pub mod user;
