#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use classroom_core::domain::{
    ClassId, ClassStatus, MaterialId, ModuleId, Progress, Role, UserId,
};
use classroom_migration::{Migrator, MigratorTrait};
use classroom_server::api::AppState;
use classroom_server::error::{AppError, Result};
use classroom_server::repository::{
    ClassRecord, ClassRepository, NewClass, NewModule, NewUser, ProgressRecord,
    ProgressRepository, SeaOrmClassRepository, SeaOrmProgressRepository,
    SeaOrmSyllabusRepository, SeaOrmUserRepository, SyllabusRepository, UserRecord,
    UserRepository,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// In-memory SQLite lives per connection, so the pool is pinned to one.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("in-memory database should open");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");
    db
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = setup_db().await;
        let state = Arc::new(AppState::new(db.clone()));
        Self { db, state }
    }

    pub async fn user(&self, name: &str, role: Role) -> UserRecord {
        SeaOrmUserRepository::new(self.db.clone())
            .create(NewUser {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                image_url: None,
                role,
            })
            .await
            .expect("user should be created")
    }

    pub async fn class(&self, owner_id: UserId, title: &str, status: ClassStatus) -> ClassRecord {
        SeaOrmClassRepository::new(self.db.clone())
            .create(NewClass {
                owner_id,
                title: title.to_string(),
                description: format!("{title} description"),
                image: None,
                video: None,
                status,
            })
            .await
            .expect("class should be created")
    }

    /// Creates `materials` materials with `modules_each` modules apiece and
    /// returns the (material, module) pairs in creation order.
    pub async fn syllabus(
        &self,
        owner_id: UserId,
        class_id: ClassId,
        materials: usize,
        modules_each: usize,
    ) -> Vec<(MaterialId, ModuleId)> {
        let repo = SeaOrmSyllabusRepository::new(self.db.clone());
        let mut pairs = Vec::new();

        for m in 1..=materials {
            let material = repo
                .create_material_owned(owner_id, class_id, format!("Material {m}"))
                .await
                .expect("material insert should succeed")
                .expect("owner should be allowed to add materials");

            for n in 1..=modules_each {
                let module = repo
                    .create_module_owned(
                        owner_id,
                        class_id,
                        material.id,
                        NewModule {
                            title: format!("Module {m}.{n}"),
                            content: format!("Content {m}.{n}"),
                            attachments: vec![format!("m{m}-{n}.pdf")],
                            videos: Vec::new(),
                        },
                    )
                    .await
                    .expect("module insert should succeed")
                    .expect("owner should be allowed to add modules");
                pairs.push((material.id, module.id));
            }
        }

        pairs
    }
}

/// Delegates to the real repository but fails every cache write while
/// `fail_cache` is set.
#[derive(Clone)]
pub struct FlakyCacheProgressRepository {
    inner: SeaOrmProgressRepository,
    fail_cache: Arc<AtomicBool>,
}

impl FlakyCacheProgressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            inner: SeaOrmProgressRepository::new(db),
            fail_cache: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_cache.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressRepository for FlakyCacheProgressRepository {
    async fn module_in_class(
        &self,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<bool> {
        self.inner
            .module_in_class(class_id, material_id, module_id)
            .await
    }

    async fn mark_done(
        &self,
        user_id: UserId,
        class_id: ClassId,
        material_id: MaterialId,
        module_id: ModuleId,
    ) -> Result<ProgressRecord> {
        self.inner
            .mark_done(user_id, class_id, material_id, module_id)
            .await
    }

    async fn counts(&self, user_id: UserId, class_id: ClassId) -> Result<Progress> {
        self.inner.counts(user_id, class_id).await
    }

    async fn refresh_cached(&self, user_id: UserId, class_id: ClassId) -> Result<()> {
        if self.fail_cache.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("cache write refused")));
        }
        self.inner.refresh_cached(user_id, class_id).await
    }

    async fn cached_for_user(&self, user_id: UserId) -> Result<Vec<(ClassId, f64)>> {
        self.inner.cached_for_user(user_id).await
    }
}
