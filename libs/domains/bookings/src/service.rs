use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::collaborators::{ItemDirectory, UserDirectory};
use crate::error::{BookingError, BookingResult};
use crate::models::{
    Booking, BookingParty, BookingQuery, BookingStatus, CreateBooking, ListParams, NewBooking,
    SearchState,
};
use crate::repository::BookingRepository;

/// Service layer handling booking business logic
#[derive(Clone)]
pub struct BookingService<R, U, I>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    repository: Arc<R>,
    users: Arc<U>,
    items: Arc<I>,
}

/// Parse a bucket name; absent means ALL, unknown is rejected
fn parse_state(state: Option<&str>) -> BookingResult<SearchState> {
    match state {
        None => Ok(SearchState::All),
        Some(value) => value
            .parse::<SearchState>()
            .map_err(|_| BookingError::UnknownState(value.to_string())),
    }
}

impl<R, U, I> BookingService<R, U, I>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, items: Arc<I>) -> Self {
        Self {
            repository,
            users,
            items,
        }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> BookingResult<()> {
        if !self.users.user_exists(user_id).await? {
            return Err(BookingError::UserNotFound(user_id));
        }
        Ok(())
    }

    fn ensure_valid_size(size: u64) -> BookingResult<()> {
        if size < 1 {
            return Err(BookingError::InvalidRequest(
                "size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create_booking(
        &self,
        user_id: Uuid,
        input: CreateBooking,
    ) -> BookingResult<Booking> {
        self.ensure_user_exists(user_id).await?;

        let item = self
            .items
            .get_item(input.item_id)
            .await?
            .ok_or(BookingError::ItemNotFound(input.item_id))?;

        // Owners cannot book their own items; answering NotFound rather
        // than Forbidden keeps the ownership relation hidden
        if item.owner_id == user_id {
            return Err(BookingError::ItemNotFound(input.item_id));
        }

        if !item.available {
            return Err(BookingError::InvalidRequest(format!(
                "Item {} is not available for booking",
                item.id
            )));
        }

        if input.start >= input.end {
            return Err(BookingError::InvalidRequest(
                "start must be strictly before end".to_string(),
            ));
        }

        self.repository
            .create(NewBooking {
                item_id: item.id,
                booker_id: user_id,
                owner_id: item.owner_id,
                start: input.start,
                end: input.end,
            })
            .await
    }

    pub async fn decide_booking(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        approved: bool,
    ) -> BookingResult<Booking> {
        let booking = self
            .repository
            .get_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        // Only the item's owner decides; a probing booker learns nothing
        if booking.owner_id != user_id {
            return Err(BookingError::NotFound(booking_id));
        }

        if booking.status != BookingStatus::Waiting {
            return Err(BookingError::InvalidRequest(format!(
                "Booking {} has already been decided",
                booking_id
            )));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        // Lost the race against a concurrent decision
        if !self.repository.decide_if_waiting(booking_id, status).await? {
            return Err(BookingError::InvalidRequest(format!(
                "Booking {} has already been decided",
                booking_id
            )));
        }

        self.repository
            .get_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))
    }

    pub async fn get_booking(&self, user_id: Uuid, booking_id: Uuid) -> BookingResult<Booking> {
        let booking = self
            .repository
            .get_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        // Visible to the booker and the item's owner only; existence is
        // not revealed to anyone else
        if booking.booker_id != user_id && booking.owner_id != user_id {
            return Err(BookingError::NotFound(booking_id));
        }

        Ok(booking)
    }

    pub async fn list_for_booker(
        &self,
        user_id: Uuid,
        params: ListParams,
    ) -> BookingResult<Vec<Booking>> {
        self.ensure_user_exists(user_id).await?;
        let bucket = parse_state(params.state.as_deref())?;
        Self::ensure_valid_size(params.size)?;

        self.repository
            .list(BookingQuery {
                party: BookingParty::Booker(user_id),
                bucket,
                now: Utc::now(),
                offset: params.from,
                limit: params.size,
            })
            .await
    }

    pub async fn list_for_owner(
        &self,
        user_id: Uuid,
        params: ListParams,
    ) -> BookingResult<Vec<Booking>> {
        self.ensure_user_exists(user_id).await?;

        // Checked before the bucket is even parsed: an owner with no
        // items has no listing, whatever the state value
        if !self.items.user_owns_items(user_id).await? {
            return Err(BookingError::UserNotFound(user_id));
        }

        let bucket = parse_state(params.state.as_deref())?;
        Self::ensure_valid_size(params.size)?;

        self.repository
            .list(BookingQuery {
                party: BookingParty::Owner(user_id),
                bucket,
                now: Utc::now(),
                offset: params.from,
                limit: params.size,
            })
            .await
    }
}
