use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// An item listed on the marketplace
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    /// Set when this item was posted in answer to an item request
    pub request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(owner_id: Uuid, input: CreateItem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            name: input.name,
            description: input.description,
            available: input.available,
            request_id: input.request_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateItem) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        self.updated_at = Utc::now();
    }
}

/// Payload for listing a new item
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(
        length(min = 1, max = 255, message = "name must be 1-255 characters"),
        custom(function = validate_not_blank)
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = 2000, message = "description must be 1-2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub description: String,

    pub available: bool,

    /// Item request this listing answers, if any
    #[serde(default)]
    pub request_id: Option<Uuid>,
}

/// Payload for partially updating an item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "description must be 1-2000 characters"))]
    pub description: Option<String>,

    pub available: Option<bool>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A comment left by a user who rented the item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub item_id: Uuid,
    pub author_id: Uuid,
    /// Resolved at read time from the users domain
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A stored comment before the author's name is resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn into_comment(self, author_name: String) -> Comment {
        Comment {
            id: self.id,
            item_id: self.item_id,
            author_id: self.author_id,
            author_name,
            text: self.text,
            created_at: self.created_at,
        }
    }
}

/// Payload for adding a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(
        length(min = 1, max = 2000, message = "text must be 1-2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub text: String,
}

/// Short view of a booking attached to an item listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BookingBrief {
    pub id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An item enriched with comments and, for the owner, booking context
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemWithDetails {
    #[serde(flatten)]
    pub item: Item,
    pub comments: Vec<Comment>,
    /// Nearest past or ongoing non-rejected booking (owner view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_booking: Option<BookingBrief>,
    /// Nearest future non-rejected booking (owner view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_booking: Option<BookingBrief>,
}

/// Pagination parameters for listing the caller's items
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct ItemFilter {
    /// Row offset to start from
    #[serde(default)]
    pub from: u64,

    /// Maximum number of items to return
    #[serde(default = "default_size")]
    pub size: u64,
}

/// Query parameters for text search
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct SearchFilter {
    /// Text to match against name and description, case-insensitively
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub from: u64,

    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    20
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_size(),
        }
    }
}
