use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::collaborators::{ItemProvider, UserDirectory};
use crate::error::{RequestError, RequestResult};
use crate::models::{CreateItemRequest, ItemRequest, RequestFilter, RequestWithItems};
use crate::repository::RequestRepository;

/// Service layer handling item-request business logic
#[derive(Clone)]
pub struct RequestService<R, U, I>
where
    R: RequestRepository,
    U: UserDirectory,
    I: ItemProvider,
{
    repository: Arc<R>,
    users: Arc<U>,
    items: Arc<I>,
}

impl<R, U, I> RequestService<R, U, I>
where
    R: RequestRepository,
    U: UserDirectory,
    I: ItemProvider,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, items: Arc<I>) -> Self {
        Self {
            repository,
            users,
            items,
        }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> RequestResult<()> {
        if !self.users.user_exists(user_id).await? {
            return Err(RequestError::UserNotFound(user_id));
        }
        Ok(())
    }

    /// Attach answering items to a batch of requests in one collaborator call
    async fn with_items(
        &self,
        requests: Vec<ItemRequest>,
    ) -> RequestResult<Vec<RequestWithItems>> {
        let ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
        let mut by_request: HashMap<Uuid, Vec<_>> = HashMap::new();
        for item in self.items.items_answering(&ids).await? {
            by_request.entry(item.request_id).or_default().push(item);
        }

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = by_request.remove(&request.id).unwrap_or_default();
                RequestWithItems { request, items }
            })
            .collect())
    }

    pub async fn create_request(
        &self,
        user_id: Uuid,
        input: CreateItemRequest,
    ) -> RequestResult<ItemRequest> {
        input
            .validate()
            .map_err(|e| RequestError::Validation(e.to_string()))?;
        self.ensure_user_exists(user_id).await?;

        self.repository.create(user_id, input).await
    }

    pub async fn own_requests(&self, user_id: Uuid) -> RequestResult<Vec<RequestWithItems>> {
        self.ensure_user_exists(user_id).await?;

        let requests = self.repository.list_for_requestor(user_id).await?;
        self.with_items(requests).await
    }

    pub async fn all_requests(
        &self,
        user_id: Uuid,
        filter: RequestFilter,
    ) -> RequestResult<Vec<RequestWithItems>> {
        if filter.size < 1 {
            return Err(RequestError::InvalidRequest(
                "size must be at least 1".to_string(),
            ));
        }
        self.ensure_user_exists(user_id).await?;

        let requests = self
            .repository
            .list_others(user_id, filter.from, filter.size)
            .await?;
        self.with_items(requests).await
    }

    pub async fn get_request(&self, user_id: Uuid, id: Uuid) -> RequestResult<RequestWithItems> {
        self.ensure_user_exists(user_id).await?;

        let request = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(RequestError::NotFound(id))?;

        let mut enriched = self.with_items(vec![request]).await?;
        enriched
            .pop()
            .ok_or_else(|| RequestError::Internal("enrichment dropped request".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockItemProvider, MockUserDirectory};
    use crate::models::AnsweringItem;
    use crate::repository::MockRequestRepository;

    fn service(
        repo: MockRequestRepository,
        users: MockUserDirectory,
        items: MockItemProvider,
    ) -> RequestService<MockRequestRepository, MockUserDirectory, MockItemProvider> {
        RequestService::new(Arc::new(repo), Arc::new(users), Arc::new(items))
    }

    fn sample_request(requestor_id: Uuid) -> ItemRequest {
        ItemRequest::new(
            requestor_id,
            CreateItemRequest {
                description: "Need a ladder".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_create_request_unknown_user() {
        let mut users = MockUserDirectory::new();
        users.expect_user_exists().returning(|_| Ok(false));

        let svc = service(
            MockRequestRepository::new(),
            users,
            MockItemProvider::new(),
        );
        let result = svc
            .create_request(
                Uuid::now_v7(),
                CreateItemRequest {
                    description: "Need a ladder".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(RequestError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_request_blank_description() {
        let svc = service(
            MockRequestRepository::new(),
            MockUserDirectory::new(),
            MockItemProvider::new(),
        );
        let result = svc
            .create_request(
                Uuid::now_v7(),
                CreateItemRequest {
                    description: "  ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(RequestError::Validation(_))));
    }

    #[tokio::test]
    async fn test_own_requests_with_answering_items() {
        let requestor = Uuid::now_v7();
        let request = sample_request(requestor);
        let request_id = request.id;

        let mut repo = MockRequestRepository::new();
        let listed = request.clone();
        repo.expect_list_for_requestor()
            .returning(move |_| Ok(vec![listed.clone()]));

        let mut users = MockUserDirectory::new();
        users.expect_user_exists().returning(|_| Ok(true));

        let mut items = MockItemProvider::new();
        items.expect_items_answering().returning(move |_| {
            Ok(vec![AnsweringItem {
                id: Uuid::now_v7(),
                name: "Ladder".to_string(),
                description: "Sturdy".to_string(),
                available: true,
                owner_id: Uuid::now_v7(),
                request_id,
            }])
        });

        let svc = service(repo, users, items);
        let result = svc.own_requests(requestor).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].items.len(), 1);
        assert_eq!(result[0].items[0].name, "Ladder");
    }

    #[tokio::test]
    async fn test_all_requests_rejects_zero_size() {
        let svc = service(
            MockRequestRepository::new(),
            MockUserDirectory::new(),
            MockItemProvider::new(),
        );
        let result = svc
            .all_requests(Uuid::now_v7(), RequestFilter { from: 0, size: 0 })
            .await;
        assert!(matches!(result, Err(RequestError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_get_request_not_found() {
        let mut repo = MockRequestRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let mut users = MockUserDirectory::new();
        users.expect_user_exists().returning(|_| Ok(true));

        let svc = service(repo, users, MockItemProvider::new());
        let result = svc.get_request(Uuid::now_v7(), Uuid::now_v7()).await;
        assert!(matches!(result, Err(RequestError::NotFound(_))));
    }
}
