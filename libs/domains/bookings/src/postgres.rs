use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::BaseRepository;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveEnum, DatabaseConnection, QueryOrder, QuerySelect, Select};
use uuid::Uuid;

use crate::entity;
use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, BookingParty, BookingQuery, BookingStatus, NewBooking, SearchState};
use crate::repository::BookingRepository;

/// PostgreSQL implementation of BookingRepository backed by SeaORM
#[derive(Clone)]
pub struct PgBookingRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

fn db_err(e: DbErr) -> BookingError {
    BookingError::Internal(format!("Database error: {}", e))
}

/// Translate a time/status bucket into SQL conditions
fn apply_bucket(
    select: Select<entity::Entity>,
    bucket: SearchState,
    now: DateTime<Utc>,
) -> Select<entity::Entity> {
    match bucket {
        SearchState::All => select,
        SearchState::Current => select
            .filter(entity::Column::StartDate.lte(now))
            .filter(entity::Column::EndDate.gte(now)),
        SearchState::Past => select.filter(entity::Column::EndDate.lt(now)),
        SearchState::Future => select.filter(entity::Column::StartDate.gt(now)),
        SearchState::Waiting => select.filter(entity::Column::Status.eq(BookingStatus::Waiting)),
        SearchState::Rejected => select.filter(entity::Column::Status.eq(BookingStatus::Rejected)),
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, input: NewBooking) -> BookingResult<Booking> {
        let active: entity::ActiveModel = input.into();
        let model = self.base.insert(active).await.map_err(db_err)?;

        tracing::info!(booking_id = %model.id, "Created booking");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let model = self.base.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    async fn decide_if_waiting(&self, id: Uuid, status: BookingStatus) -> BookingResult<bool> {
        // Conditional update: only one of two concurrent decisions can
        // observe rows_affected == 1
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, status.as_enum())
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.eq(BookingStatus::Waiting))
            .exec(self.db())
            .await
            .map_err(db_err)?;

        let decided = result.rows_affected > 0;
        if decided {
            tracing::info!(booking_id = %id, status = %status, "Decided booking");
        }
        Ok(decided)
    }

    async fn list(&self, query: BookingQuery) -> BookingResult<Vec<Booking>> {
        let select = match query.party {
            BookingParty::Booker(user_id) => {
                entity::Entity::find().filter(entity::Column::BookerId.eq(user_id))
            }
            BookingParty::Owner(user_id) => {
                entity::Entity::find().filter(entity::Column::OwnerId.eq(user_id))
            }
        };

        let models = apply_bucket(select, query.bucket, query.now)
            .order_by_desc(entity::Column::StartDate)
            .offset(query.offset)
            .limit(query.limit)
            .all(self.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn last_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ItemId.eq(item_id))
            .filter(entity::Column::Status.ne(BookingStatus::Rejected))
            .filter(entity::Column::StartDate.lte(now))
            .order_by_desc(entity::Column::StartDate)
            .one(self.db())
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    async fn next_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ItemId.eq(item_id))
            .filter(entity::Column::Status.ne(BookingStatus::Rejected))
            .filter(entity::Column::StartDate.gt(now))
            .order_by_asc(entity::Column::StartDate)
            .one(self.db())
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    async fn has_begun_booking(
        &self,
        booker_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::BookerId.eq(booker_id))
            .filter(entity::Column::ItemId.eq(item_id))
            .filter(entity::Column::Status.ne(BookingStatus::Rejected))
            .filter(entity::Column::StartDate.lte(now))
            .count(self.db())
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }
}
