use async_trait::async_trait;
use uuid::Uuid;

use crate::error::BookingResult;

/// What the bookings domain needs to know about an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSnapshot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub available: bool,
}

/// Lookup into the users domain, implemented by the composing application
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: Uuid) -> BookingResult<bool>;
}

/// Lookup into the items domain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    async fn get_item(&self, id: Uuid) -> BookingResult<Option<ItemSnapshot>>;

    /// Whether the user owns at least one item
    async fn user_owns_items(&self, user_id: Uuid) -> BookingResult<bool>;
}
