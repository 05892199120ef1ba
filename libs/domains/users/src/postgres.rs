use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, Set};
use uuid::Uuid;

use crate::entity;
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository backed by SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let active: entity::ActiveModel = input.into();
        let model = self
            .base
            .insert(active)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .ok_or(UserError::NotFound(id))?;

        let mut active: entity::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }

        let updated = self
            .base
            .update(active)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let rows = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if rows > 0 {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(rows > 0)
    }

    async fn exists_by_email(&self, email: &str, exclude: Option<Uuid>) -> UserResult<bool> {
        let mut query = entity::Entity::find().filter(entity::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(entity::Column::Id.ne(id));
        }

        let count = query
            .count(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;
        Ok(count > 0)
    }
}
