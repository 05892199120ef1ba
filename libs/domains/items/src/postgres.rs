use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::entity::{comment, item};
use crate::error::{ItemError, ItemResult};
use crate::models::{CommentRecord, CreateItem, Item, UpdateItem};
use crate::repository::ItemRepository;

/// PostgreSQL implementation of ItemRepository backed by SeaORM
#[derive(Clone)]
pub struct PgItemRepository {
    base: BaseRepository<item::Entity>,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

fn db_err(e: DbErr) -> ItemError {
    ItemError::Internal(format!("Database error: {}", e))
}

/// Escape LIKE metacharacters so search text matches literally.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item> {
        let active = item::ActiveModel::from_create(owner_id, input);
        let model = self.base.insert(active).await.map_err(db_err)?;

        tracing::info!(item_id = %model.id, "Created item");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let model = self.base.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(ItemError::NotFound(id))?;

        let mut active: item::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(available) = input.available {
            active.available = Set(available);
        }

        let updated = self.base.update(active).await.map_err(db_err)?;

        tracing::info!(item_id = %id, "Updated item");
        Ok(updated.into())
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> ItemResult<Vec<Item>> {
        let models = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_asc(item::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn owner_has_items(&self, owner_id: Uuid) -> ItemResult<bool> {
        let count = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .count(self.db())
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn search(&self, text: &str, offset: u64, limit: u64) -> ItemResult<Vec<Item>> {
        let pattern = format!("%{}%", escape_like(text));
        let models = item::Entity::find()
            .filter(item::Column::Available.eq(true))
            .filter(
                Condition::any()
                    .add(Expr::col(item::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(item::Column::Description).ilike(pattern)),
            )
            .order_by_asc(item::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_request_ids(&self, request_ids: &[Uuid]) -> ItemResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = item::Entity::find()
            .filter(item::Column::RequestId.is_in(request_ids.iter().copied()))
            .all(self.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn add_comment(
        &self,
        item_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> ItemResult<CommentRecord> {
        let active = comment::ActiveModel::new(item_id, author_id, text);
        let model = active.insert(self.db()).await.map_err(db_err)?;

        tracing::info!(comment_id = %model.id, item_id = %item_id, "Added comment");
        Ok(model.into())
    }

    async fn comments_for_items(&self, item_ids: &[Uuid]) -> ItemResult<Vec<CommentRecord>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = comment::Entity::find()
            .filter(comment::Column::ItemId.is_in(item_ids.iter().copied()))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100% wool"), "100\\% wool");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain drill"), "plain drill");
    }
}
