use crate::entity::user;
use crate::error::{AppError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use classroom_core::domain::{Role, UserId};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::str::FromStr;

use super::{classify_insert_error, now, parse_user_id};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub role: Role,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord>;
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: user::Model) -> anyhow::Result<UserRecord> {
        let role = Role::from_str(&model.role)
            .map_err(|e| anyhow!("invalid users.role for '{}' from database: {e}", model.id))?;

        Ok(UserRecord {
            id: parse_user_id("users.id", &model.id)?,
            name: model.name,
            email: model.email,
            image_url: model.image_url,
            role,
        })
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let id = UserId::new();
        let timestamp = now();

        let active_model = user::ActiveModel {
            id: Set(id.to_string()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            image_url: Set(new_user.image_url),
            role: Set(new_user.role.as_str().to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        let model = active_model.insert(&self.db).await.map_err(|err| {
            classify_insert_error(
                err,
                || AppError::InvalidReference("Email is already registered".to_string()),
                || AppError::InvalidReference("Invalid user reference".to_string()),
            )
        })?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let model = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }
}
