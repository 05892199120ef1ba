use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::collaborators::{BookingLookup, UserDirectory};
use crate::error::{ItemError, ItemResult};
use crate::models::{
    Comment, CommentRecord, CreateComment, CreateItem, Item, ItemFilter, ItemWithDetails,
    SearchFilter, UpdateItem,
};
use crate::repository::ItemRepository;

/// Service layer handling item business logic
#[derive(Clone)]
pub struct ItemService<R, U, B>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    repository: Arc<R>,
    users: Arc<U>,
    bookings: Arc<B>,
}

impl<R, U, B> ItemService<R, U, B>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, bookings: Arc<B>) -> Self {
        Self {
            repository,
            users,
            bookings,
        }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> ItemResult<()> {
        if !self.users.user_exists(user_id).await? {
            return Err(ItemError::UserNotFound(user_id));
        }
        Ok(())
    }

    /// Resolve author names for a batch of stored comments
    async fn resolve_comments(&self, records: Vec<CommentRecord>) -> ItemResult<Vec<Comment>> {
        let author_ids: Vec<Uuid> = records.iter().map(|c| c.author_id).collect();
        let names = self.users.user_names(&author_ids).await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let name = names.get(&record.author_id).cloned().unwrap_or_default();
                record.into_comment(name)
            })
            .collect())
    }

    /// Attach comments and, for the owner view, last/next bookings
    async fn with_details(
        &self,
        items: Vec<Item>,
        owner_view: bool,
        now: DateTime<Utc>,
    ) -> ItemResult<Vec<ItemWithDetails>> {
        let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        let comments = self
            .resolve_comments(self.repository.comments_for_items(&item_ids).await?)
            .await?;

        let mut by_item: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_item.entry(comment.item_id).or_default().push(comment);
        }

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let (last_booking, next_booking) = if owner_view {
                (
                    self.bookings.last_for_item(item.id, now).await?,
                    self.bookings.next_for_item(item.id, now).await?,
                )
            } else {
                (None, None)
            };

            result.push(ItemWithDetails {
                comments: by_item.remove(&item.id).unwrap_or_default(),
                last_booking,
                next_booking,
                item,
            });
        }
        Ok(result)
    }

    pub async fn create_item(&self, user_id: Uuid, input: CreateItem) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        self.ensure_user_exists(user_id).await?;

        self.repository.create(user_id, input).await
    }

    pub async fn update_item(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateItem,
    ) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        let item = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        // A non-owner is told the item does not exist
        if item.owner_id != user_id {
            return Err(ItemError::NotFound(id));
        }

        self.repository.update(id, input).await
    }

    pub async fn get_item(&self, user_id: Uuid, id: Uuid) -> ItemResult<ItemWithDetails> {
        let item = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        let owner_view = item.owner_id == user_id;
        let mut detailed = self.with_details(vec![item], owner_view, Utc::now()).await?;
        detailed
            .pop()
            .ok_or_else(|| ItemError::Internal("enrichment dropped item".to_string()))
    }

    pub async fn own_items(
        &self,
        user_id: Uuid,
        filter: ItemFilter,
    ) -> ItemResult<Vec<ItemWithDetails>> {
        if filter.size < 1 {
            return Err(ItemError::InvalidRequest(
                "size must be at least 1".to_string(),
            ));
        }

        let items = self
            .repository
            .list_for_owner(user_id, filter.from, filter.size)
            .await?;
        self.with_details(items, true, Utc::now()).await
    }

    pub async fn search_items(&self, filter: SearchFilter) -> ItemResult<Vec<Item>> {
        // Blank text short-circuits without touching storage
        if filter.text.trim().is_empty() {
            return Ok(Vec::new());
        }
        if filter.size < 1 {
            return Err(ItemError::InvalidRequest(
                "size must be at least 1".to_string(),
            ));
        }

        self.repository
            .search(&filter.text, filter.from, filter.size)
            .await
    }

    pub async fn add_comment(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        input: CreateComment,
    ) -> ItemResult<Comment> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        self.repository
            .get_by_id(item_id)
            .await?
            .ok_or(ItemError::NotFound(item_id))?;
        self.ensure_user_exists(user_id).await?;

        let now = Utc::now();
        if !self
            .bookings
            .has_begun_booking(user_id, item_id, now)
            .await?
        {
            return Err(ItemError::InvalidRequest(
                "Commenting requires a booking of this item that has begun".to_string(),
            ));
        }

        let record = self
            .repository
            .add_comment(item_id, user_id, input.text)
            .await?;

        let names = self.users.user_names(&[user_id]).await?;
        let author_name = names.get(&user_id).cloned().unwrap_or_default();
        Ok(record.into_comment(author_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockBookingLookup, MockUserDirectory};
    use crate::models::BookingBrief;
    use crate::repository::MockItemRepository;

    fn service(
        repo: MockItemRepository,
        users: MockUserDirectory,
        bookings: MockBookingLookup,
    ) -> ItemService<MockItemRepository, MockUserDirectory, MockBookingLookup> {
        ItemService::new(Arc::new(repo), Arc::new(users), Arc::new(bookings))
    }

    fn create_input(name: &str) -> CreateItem {
        CreateItem {
            name: name.to_string(),
            description: "A tool".to_string(),
            available: true,
            request_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_item_unknown_owner() {
        let mut users = MockUserDirectory::new();
        users.expect_user_exists().returning(|_| Ok(false));

        let svc = service(MockItemRepository::new(), users, MockBookingLookup::new());
        let result = svc.create_item(Uuid::now_v7(), create_input("Drill")).await;
        assert!(matches!(result, Err(ItemError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_item_by_non_owner_is_not_found() {
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let item = Item::new(owner, create_input("Drill"));

        let mut repo = MockItemRepository::new();
        let stored = item.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let svc = service(repo, MockUserDirectory::new(), MockBookingLookup::new());
        let result = svc
            .update_item(stranger, item.id, UpdateItem::default())
            .await;
        assert!(matches!(result, Err(ItemError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_blank_text_skips_storage() {
        // No expectations set: any repository call would panic
        let svc = service(
            MockItemRepository::new(),
            MockUserDirectory::new(),
            MockBookingLookup::new(),
        );

        let found = svc
            .search_items(SearchFilter {
                text: "   ".to_string(),
                from: 0,
                size: 20,
            })
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_get_item_owner_sees_bookings() {
        let owner = Uuid::now_v7();
        let item = Item::new(owner, create_input("Drill"));
        let item_id = item.id;

        let mut repo = MockItemRepository::new();
        let stored = item.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_comments_for_items().returning(|_| Ok(vec![]));

        let mut users = MockUserDirectory::new();
        users.expect_user_names().returning(|_| Ok(HashMap::new()));

        let mut bookings = MockBookingLookup::new();
        bookings.expect_last_for_item().returning(move |_, now| {
            Ok(Some(BookingBrief {
                id: Uuid::now_v7(),
                booker_id: Uuid::now_v7(),
                start: now - chrono::Duration::days(3),
                end: now - chrono::Duration::days(1),
            }))
        });
        bookings.expect_next_for_item().returning(|_, _| Ok(None));

        let svc = service(repo, users, bookings);
        let detailed = svc.get_item(owner, item_id).await.unwrap();
        assert!(detailed.last_booking.is_some());
        assert!(detailed.next_booking.is_none());
    }

    #[tokio::test]
    async fn test_get_item_stranger_sees_no_bookings() {
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let item = Item::new(owner, create_input("Drill"));
        let item_id = item.id;

        let mut repo = MockItemRepository::new();
        let stored = item.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_comments_for_items().returning(|_| Ok(vec![]));

        let mut users = MockUserDirectory::new();
        users.expect_user_names().returning(|_| Ok(HashMap::new()));

        // No BookingLookup expectations: the stranger view must not ask
        let svc = service(repo, users, MockBookingLookup::new());
        let detailed = svc.get_item(stranger, item_id).await.unwrap();
        assert!(detailed.last_booking.is_none());
        assert!(detailed.next_booking.is_none());
    }

    #[tokio::test]
    async fn test_add_comment_requires_begun_booking() {
        let owner = Uuid::now_v7();
        let author = Uuid::now_v7();
        let item = Item::new(owner, create_input("Drill"));
        let item_id = item.id;

        let mut repo = MockItemRepository::new();
        let stored = item.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut users = MockUserDirectory::new();
        users.expect_user_exists().returning(|_| Ok(true));

        let mut bookings = MockBookingLookup::new();
        bookings
            .expect_has_begun_booking()
            .returning(|_, _, _| Ok(false));

        let svc = service(repo, users, bookings);
        let result = svc
            .add_comment(
                author,
                item_id,
                CreateComment {
                    text: "never used it".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(ItemError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_add_comment_resolves_author_name() {
        let owner = Uuid::now_v7();
        let author = Uuid::now_v7();
        let item = Item::new(owner, create_input("Drill"));
        let item_id = item.id;

        let mut repo = MockItemRepository::new();
        let stored = item.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_add_comment()
            .returning(|item_id, author_id, text| {
                Ok(CommentRecord {
                    id: Uuid::now_v7(),
                    item_id,
                    author_id,
                    text,
                    created_at: Utc::now(),
                })
            });

        let mut users = MockUserDirectory::new();
        users.expect_user_exists().returning(|_| Ok(true));
        users.expect_user_names().returning(move |ids| {
            Ok(ids
                .iter()
                .map(|id| (*id, "Alice".to_string()))
                .collect::<HashMap<_, _>>())
        });

        let mut bookings = MockBookingLookup::new();
        bookings
            .expect_has_begun_booking()
            .returning(|_, _, _| Ok(true));

        let svc = service(repo, users, bookings);
        let comment = svc
            .add_comment(
                author,
                item_id,
                CreateComment {
                    text: "worked great".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.author_name, "Alice");
        assert_eq!(comment.author_id, author);
    }
}
