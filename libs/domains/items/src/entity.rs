//! Sea-ORM entities for the items and comments tables

pub mod item {
    use sea_orm::ActiveValue::Set;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    use crate::models::{CreateItem, Item};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub available: bool,
        pub owner_id: Uuid,
        pub request_id: Option<Uuid>,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Item {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                owner_id: model.owner_id,
                name: model.name,
                description: model.description,
                available: model.available,
                request_id: model.request_id,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl ActiveModel {
        pub fn from_create(owner_id: Uuid, input: CreateItem) -> Self {
            let now = chrono::Utc::now();
            Self {
                id: Set(Uuid::now_v7()),
                name: Set(input.name),
                description: Set(input.description),
                available: Set(input.available),
                owner_id: Set(owner_id),
                request_id: Set(input.request_id),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

pub mod comment {
    use sea_orm::ActiveValue::Set;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    use crate::models::CommentRecord;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "comments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub text: String,
        pub item_id: Uuid,
        pub author_id: Uuid,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for CommentRecord {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                item_id: model.item_id,
                author_id: model.author_id,
                text: model.text,
                created_at: model.created_at.into(),
            }
        }
    }

    impl ActiveModel {
        pub fn new(item_id: Uuid, author_id: Uuid, text: String) -> Self {
            Self {
                id: Set(Uuid::now_v7()),
                text: Set(text),
                item_id: Set(item_id),
                author_id: Set(author_id),
                created_at: Set(chrono::Utc::now().into()),
            }
        }
    }
}
