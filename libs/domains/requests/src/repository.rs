use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RequestResult;
use crate::models::{CreateItemRequest, ItemRequest};

/// Repository trait for ItemRequest persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Create a new item request for the given requestor
    async fn create(&self, requestor_id: Uuid, input: CreateItemRequest)
        -> RequestResult<ItemRequest>;

    /// Get a request by ID
    async fn get_by_id(&self, id: Uuid) -> RequestResult<Option<ItemRequest>>;

    /// The requestor's own requests, newest first
    async fn list_for_requestor(&self, requestor_id: Uuid) -> RequestResult<Vec<ItemRequest>>;

    /// Other users' requests, newest first, paginated
    async fn list_others(
        &self,
        requestor_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> RequestResult<Vec<ItemRequest>>;
}

/// In-memory implementation of RequestRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRequestRepository {
    requests: Arc<RwLock<HashMap<Uuid, ItemRequest>>>,
}

impl InMemoryRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn create(
        &self,
        requestor_id: Uuid,
        input: CreateItemRequest,
    ) -> RequestResult<ItemRequest> {
        let request = ItemRequest::new(requestor_id, input);
        let mut requests = self.requests.write().await;
        requests.insert(request.id, request.clone());

        tracing::info!(request_id = %request.id, "Created item request");
        Ok(request)
    }

    async fn get_by_id(&self, id: Uuid) -> RequestResult<Option<ItemRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn list_for_requestor(&self, requestor_id: Uuid) -> RequestResult<Vec<ItemRequest>> {
        let requests = self.requests.read().await;
        let mut result: Vec<ItemRequest> = requests
            .values()
            .filter(|r| r.requestor_id == requestor_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_others(
        &self,
        requestor_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> RequestResult<Vec<ItemRequest>> {
        let requests = self.requests.read().await;
        let mut result: Vec<ItemRequest> = requests
            .values()
            .filter(|r| r.requestor_id != requestor_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(description: &str) -> CreateItemRequest {
        CreateItemRequest {
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_request() {
        let repo = InMemoryRequestRepository::new();
        let requestor = Uuid::now_v7();

        let request = repo
            .create(requestor, create_input("Need a drill"))
            .await
            .unwrap();

        let fetched = repo.get_by_id(request.id).await.unwrap();
        assert_eq!(fetched.unwrap().description, "Need a drill");
    }

    #[tokio::test]
    async fn test_list_for_requestor_newest_first() {
        let repo = InMemoryRequestRepository::new();
        let requestor = Uuid::now_v7();

        let first = repo
            .create(requestor, create_input("first"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = repo
            .create(requestor, create_input("second"))
            .await
            .unwrap();

        let list = repo.list_for_requestor(requestor).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_others_excludes_own() {
        let repo = InMemoryRequestRepository::new();
        let requestor = Uuid::now_v7();
        let other = Uuid::now_v7();

        repo.create(requestor, create_input("mine")).await.unwrap();
        repo.create(other, create_input("theirs")).await.unwrap();

        let list = repo.list_others(requestor, 0, 20).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].description, "theirs");
    }
}
