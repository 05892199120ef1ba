//! Cross-domain collaborators backed by the Postgres repositories
//!
//! Each domain crate declares the traits it needs from its neighbours
//! (`UserDirectory`, `ItemDirectory`, ...) without depending on them.
//! The composing application wires those seams here, on top of the
//! same repositories the domain routers use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use domain_bookings::{
    BookingError, BookingRepository, BookingResult, ItemSnapshot, PgBookingRepository,
};
use domain_items::{BookingBrief, ItemError, ItemRepository, ItemResult, PgItemRepository};
use domain_requests::{AnsweringItem, RequestError, RequestResult};
use domain_users::{PgUserRepository, UserRepository};

/// User lookups for the items, bookings and requests domains
pub struct UserLookup {
    users: Arc<PgUserRepository>,
}

impl UserLookup {
    pub fn new(users: Arc<PgUserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl domain_bookings::UserDirectory for UserLookup {
    async fn user_exists(&self, id: Uuid) -> BookingResult<bool> {
        let user = self
            .users
            .get_by_id(id)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(user.is_some())
    }
}

#[async_trait]
impl domain_requests::UserDirectory for UserLookup {
    async fn user_exists(&self, id: Uuid) -> RequestResult<bool> {
        let user = self
            .users
            .get_by_id(id)
            .await
            .map_err(|e| RequestError::Internal(e.to_string()))?;
        Ok(user.is_some())
    }
}

#[async_trait]
impl domain_items::UserDirectory for UserLookup {
    async fn user_exists(&self, id: Uuid) -> ItemResult<bool> {
        let user = self
            .users
            .get_by_id(id)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        Ok(user.is_some())
    }

    async fn user_names(&self, ids: &[Uuid]) -> ItemResult<HashMap<Uuid, String>> {
        let mut names = HashMap::with_capacity(ids.len());
        for &id in ids {
            let user = self
                .users
                .get_by_id(id)
                .await
                .map_err(|e| ItemError::Internal(e.to_string()))?;
            if let Some(user) = user {
                names.insert(id, user.name);
            }
        }
        Ok(names)
    }
}

/// Item lookups for the bookings and requests domains
pub struct ItemLookup {
    items: Arc<PgItemRepository>,
}

impl ItemLookup {
    pub fn new(items: Arc<PgItemRepository>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl domain_bookings::ItemDirectory for ItemLookup {
    async fn get_item(&self, id: Uuid) -> BookingResult<Option<ItemSnapshot>> {
        let item = self
            .items
            .get_by_id(id)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(item.map(|item| ItemSnapshot {
            id: item.id,
            owner_id: item.owner_id,
            available: item.available,
        }))
    }

    async fn user_owns_items(&self, user_id: Uuid) -> BookingResult<bool> {
        self.items
            .owner_has_items(user_id)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))
    }
}

#[async_trait]
impl domain_requests::ItemProvider for ItemLookup {
    async fn items_answering(&self, request_ids: &[Uuid]) -> RequestResult<Vec<AnsweringItem>> {
        let items = self
            .items
            .list_by_request_ids(request_ids)
            .await
            .map_err(|e| RequestError::Internal(e.to_string()))?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                item.request_id.map(|request_id| AnsweringItem {
                    id: item.id,
                    name: item.name,
                    description: item.description,
                    available: item.available,
                    owner_id: item.owner_id,
                    request_id,
                })
            })
            .collect())
    }
}

/// Booking lookups for item enrichment and comment gating
pub struct BookingHistory {
    bookings: Arc<PgBookingRepository>,
}

impl BookingHistory {
    pub fn new(bookings: Arc<PgBookingRepository>) -> Self {
        Self { bookings }
    }
}

fn brief(booking: domain_bookings::Booking) -> BookingBrief {
    BookingBrief {
        id: booking.id,
        booker_id: booking.booker_id,
        start: booking.start,
        end: booking.end,
    }
}

#[async_trait]
impl domain_items::BookingLookup for BookingHistory {
    async fn last_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> ItemResult<Option<BookingBrief>> {
        let booking = self
            .bookings
            .last_for_item(item_id, now)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        Ok(booking.map(brief))
    }

    async fn next_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> ItemResult<Option<BookingBrief>> {
        let booking = self
            .bookings
            .next_for_item(item_id, now)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        Ok(booking.map(brief))
    }

    async fn has_begun_booking(
        &self,
        author_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> ItemResult<bool> {
        self.bookings
            .has_begun_booking(author_id, item_id, now)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))
    }
}
