use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Booking, BookingStatus, NewBooking};

/// Sea-ORM Entity for the bookings table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub booker_id: Uuid,
    pub owner_id: Uuid,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub status: BookingStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Booking {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            item_id: model.item_id,
            booker_id: model.booker_id,
            owner_id: model.owner_id,
            start: model.start_date.into(),
            end: model.end_date.into(),
            status: model.status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<NewBooking> for ActiveModel {
    fn from(input: NewBooking) -> Self {
        let now = chrono::Utc::now();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            item_id: Set(input.item_id),
            booker_id: Set(input.booker_id),
            owner_id: Set(input.owner_id),
            start_date: Set(input.start.into()),
            end_date: Set(input.end.into()),
            status: Set(BookingStatus::Waiting),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
