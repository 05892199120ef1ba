use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RequestResult;
use crate::models::AnsweringItem;

/// Lookup into the users domain, implemented by the composing application
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: Uuid) -> RequestResult<bool>;
}

/// Lookup into the items domain for items answering requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemProvider: Send + Sync {
    /// Items whose request_id is in the given set
    async fn items_answering(&self, request_ids: &[Uuid]) -> RequestResult<Vec<AnsweringItem>>;
}
