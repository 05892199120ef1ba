use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{CommentRecord, CreateItem, Item, UpdateItem};

/// Repository trait for Item and Comment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Create a new item owned by the given user
    async fn create(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item>;

    /// Get an item by ID
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    /// Update an existing item
    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item>;

    /// The owner's items ordered by id, paginated
    async fn list_for_owner(&self, owner_id: Uuid, offset: u64, limit: u64)
        -> ItemResult<Vec<Item>>;

    /// Whether the user owns at least one item
    async fn owner_has_items(&self, owner_id: Uuid) -> ItemResult<bool>;

    /// Available items whose name or description contains the text,
    /// case-insensitively
    async fn search(&self, text: &str, offset: u64, limit: u64) -> ItemResult<Vec<Item>>;

    /// Items answering any of the given item requests
    async fn list_by_request_ids(&self, request_ids: &[Uuid]) -> ItemResult<Vec<Item>>;

    /// Store a comment on an item
    async fn add_comment(
        &self,
        item_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> ItemResult<CommentRecord>;

    /// All comments on the given items, oldest first
    async fn comments_for_items(&self, item_ids: &[Uuid]) -> ItemResult<Vec<CommentRecord>>;
}

/// In-memory implementation of ItemRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
    comments: Arc<RwLock<Vec<CommentRecord>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, owner_id: Uuid, input: CreateItem) -> ItemResult<Item> {
        let item = Item::new(owner_id, input);
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());

        tracing::info!(item_id = %item.id, "Created item");
        Ok(item)
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(ItemError::NotFound(id))?;
        item.apply_update(input);

        tracing::info!(item_id = %id, "Updated item");
        Ok(item.clone())
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        let mut result: Vec<Item> = items
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by_key(|i| i.id);
        Ok(result
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn owner_has_items(&self, owner_id: Uuid) -> ItemResult<bool> {
        let items = self.items.read().await;
        Ok(items.values().any(|i| i.owner_id == owner_id))
    }

    async fn search(&self, text: &str, offset: u64, limit: u64) -> ItemResult<Vec<Item>> {
        let needle = text.to_lowercase();
        let items = self.items.read().await;
        let mut result: Vec<Item> = items
            .values()
            .filter(|i| {
                i.available
                    && (i.name.to_lowercase().contains(&needle)
                        || i.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        result.sort_by_key(|i| i.id);
        Ok(result
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn list_by_request_ids(&self, request_ids: &[Uuid]) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|i| i.request_id.is_some_and(|r| request_ids.contains(&r)))
            .cloned()
            .collect())
    }

    async fn add_comment(
        &self,
        item_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> ItemResult<CommentRecord> {
        let record = CommentRecord {
            id: Uuid::now_v7(),
            item_id,
            author_id,
            text,
            created_at: chrono::Utc::now(),
        };
        let mut comments = self.comments.write().await;
        comments.push(record.clone());

        tracing::info!(comment_id = %record.id, item_id = %item_id, "Added comment");
        Ok(record)
    }

    async fn comments_for_items(&self, item_ids: &[Uuid]) -> ItemResult<Vec<CommentRecord>> {
        let comments = self.comments.read().await;
        let mut result: Vec<CommentRecord> = comments
            .iter()
            .filter(|c| item_ids.contains(&c.item_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }
}
