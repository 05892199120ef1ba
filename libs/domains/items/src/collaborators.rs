use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::BookingBrief;

/// Lookup into the users domain, implemented by the composing application
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: Uuid) -> ItemResult<bool>;

    /// Display names for a set of users; absent ids are simply missing
    async fn user_names(&self, ids: &[Uuid]) -> ItemResult<HashMap<Uuid, String>>;
}

/// Lookup into the bookings domain for item enrichment and comment gating
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingLookup: Send + Sync {
    /// Nearest past or ongoing non-rejected booking of the item
    async fn last_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> ItemResult<Option<BookingBrief>>;

    /// Nearest future non-rejected booking of the item
    async fn next_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> ItemResult<Option<BookingBrief>>;

    /// Whether the author has a non-rejected booking of the item that has begun
    async fn has_begun_booking(
        &self,
        author_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> ItemResult<bool>;
}
