//! 统一的应用状态。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repository::{
    SeaOrmAssignmentRepository, SeaOrmClassRepository, SeaOrmEnrollmentRepository,
    SeaOrmProgressRepository, SeaOrmSubmissionRepository, SeaOrmSyllabusRepository,
    SeaOrmUserRepository, UserRepository,
};
use crate::service::{
    ClassService, CourseworkService, EnrollmentManager, OverviewComposer, ProgressTracker,
    SyllabusService,
};

/// 统一的应用状态，所有请求共享，不含可变数据。
pub struct AppState {
    /// 班级生命周期与可见性。
    pub classes: ClassService,
    /// 选课管理。
    pub enrollments: EnrollmentManager,
    /// 学习进度跟踪。
    pub progress: ProgressTracker,
    /// 班级概览组装。
    pub overview: OverviewComposer,
    pub syllabus: SyllabusService,
    pub coursework: CourseworkService,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// 基于同一个连接池构建全部仓储与服务。
    pub fn new(db: DatabaseConnection) -> Self {
        let classes = Arc::new(SeaOrmClassRepository::new(db.clone()));
        let enrollments = Arc::new(SeaOrmEnrollmentRepository::new(db.clone()));
        let progress = Arc::new(SeaOrmProgressRepository::new(db.clone()));
        let syllabus = Arc::new(SeaOrmSyllabusRepository::new(db.clone()));
        let assignments = Arc::new(SeaOrmAssignmentRepository::new(db.clone()));
        let submissions = Arc::new(SeaOrmSubmissionRepository::new(db.clone()));
        let users = Arc::new(SeaOrmUserRepository::new(db));

        Self {
            classes: ClassService::new(classes.clone()),
            enrollments: EnrollmentManager::new(classes.clone(), enrollments.clone()),
            progress: ProgressTracker::new(classes.clone(), progress.clone()),
            overview: OverviewComposer::new(
                classes.clone(),
                enrollments,
                syllabus.clone(),
                progress,
            ),
            syllabus: SyllabusService::new(syllabus),
            coursework: CourseworkService::new(classes, assignments, submissions),
            users,
        }
    }
}
