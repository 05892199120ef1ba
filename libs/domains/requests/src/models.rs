use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A request for an item that is not yet listed on the marketplace
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ItemRequest {
    pub id: Uuid,
    pub requestor_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl ItemRequest {
    pub fn new(requestor_id: Uuid, input: CreateItemRequest) -> Self {
        Self {
            id: Uuid::now_v7(),
            requestor_id,
            description: input.description,
            created_at: Utc::now(),
        }
    }
}

/// Payload for creating an item request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(
        length(min = 1, max = 1000, message = "description must be 1-1000 characters"),
        custom(function = validate_not_blank)
    )]
    pub description: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// An item listed as an answer to a request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnsweringItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: Uuid,
    pub request_id: Uuid,
}

/// An item request together with the items answering it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestWithItems {
    #[serde(flatten)]
    pub request: ItemRequest,
    pub items: Vec<AnsweringItem>,
}

/// Pagination parameters for listing other users' requests
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct RequestFilter {
    /// Row offset to start from
    #[serde(default)]
    pub from: u64,

    /// Maximum number of requests to return
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    20
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_fails_validation() {
        let input = CreateItemRequest {
            description: "   ".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_filter_defaults() {
        let filter: RequestFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.from, 0);
        assert_eq!(filter.size, 20);
    }
}
