use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::entity;
use crate::error::{RequestError, RequestResult};
use crate::models::{CreateItemRequest, ItemRequest};
use crate::repository::RequestRepository;

/// PostgreSQL implementation of RequestRepository backed by SeaORM
#[derive(Clone)]
pub struct PgRequestRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn create(
        &self,
        requestor_id: Uuid,
        input: CreateItemRequest,
    ) -> RequestResult<ItemRequest> {
        let active = entity::ActiveModel::from_create(requestor_id, input);
        let model = self
            .base
            .insert(active)
            .await
            .map_err(|e| RequestError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(request_id = %model.id, "Created item request");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> RequestResult<Option<ItemRequest>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| RequestError::Internal(format!("Database error: {}", e)))?;
        Ok(model.map(Into::into))
    }

    async fn list_for_requestor(&self, requestor_id: Uuid) -> RequestResult<Vec<ItemRequest>> {
        let models = entity::Entity::find()
            .filter(entity::Column::RequestorId.eq(requestor_id))
            .order_by_desc(entity::Column::CreatedAt)
            .all(self.base.db())
            .await
            .map_err(|e| RequestError::Internal(format!("Database error: {}", e)))?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_others(
        &self,
        requestor_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> RequestResult<Vec<ItemRequest>> {
        let models = entity::Entity::find()
            .filter(entity::Column::RequestorId.ne(requestor_id))
            .order_by_desc(entity::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.base.db())
            .await
            .map_err(|e| RequestError::Internal(format!("Database error: {}", e)))?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
