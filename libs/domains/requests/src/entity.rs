use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::models::{CreateItemRequest, ItemRequest};

/// Sea-ORM Entity for the item_requests table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub requestor_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ItemRequest {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            requestor_id: model.requestor_id,
            description: model.description,
            created_at: model.created_at.into(),
        }
    }
}

impl ActiveModel {
    pub fn from_create(requestor_id: Uuid, input: CreateItemRequest) -> Self {
        Self {
            id: Set(Uuid::now_v7()),
            description: Set(input.description),
            requestor_id: Set(requestor_id),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
