use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::BookingResult;
use crate::models::{Booking, BookingParty, BookingQuery, BookingStatus, NewBooking};

/// Repository trait for Booking persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking with status WAITING
    async fn create(&self, input: NewBooking) -> BookingResult<Booking>;

    /// Get a booking by ID
    async fn get_by_id(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    /// Set the status of a still-waiting booking.
    ///
    /// The update is conditional on the current status being WAITING so
    /// concurrent decisions cannot both win. Returns false when no row
    /// changed, meaning the booking was already decided (or is gone).
    async fn decide_if_waiting(&self, id: Uuid, status: BookingStatus) -> BookingResult<bool>;

    /// Bookings matching the query, ordered by start descending
    async fn list(&self, query: BookingQuery) -> BookingResult<Vec<Booking>>;

    /// Nearest past or ongoing non-rejected booking of the item
    async fn last_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>>;

    /// Nearest future non-rejected booking of the item
    async fn next_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>>;

    /// Whether the booker has a non-rejected booking of the item that has begun
    async fn has_begun_booking(
        &self,
        booker_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<bool>;
}

/// In-memory implementation of BookingRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, input: NewBooking) -> BookingResult<Booking> {
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::now_v7(),
            item_id: input.item_id,
            booker_id: input.booker_id,
            owner_id: input.owner_id,
            start: input.start,
            end: input.end,
            status: BookingStatus::Waiting,
            created_at: now,
            updated_at: now,
        };

        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id, booking.clone());

        tracing::info!(booking_id = %booking.id, "Created booking");
        Ok(booking)
    }

    async fn get_by_id(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&id).cloned())
    }

    async fn decide_if_waiting(&self, id: Uuid, status: BookingStatus) -> BookingResult<bool> {
        let mut bookings = self.bookings.write().await;
        match bookings.get_mut(&id) {
            Some(booking) if booking.status == BookingStatus::Waiting => {
                booking.status = status;
                booking.updated_at = Utc::now();
                tracing::info!(booking_id = %id, status = %status, "Decided booking");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self, query: BookingQuery) -> BookingResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|b| match query.party {
                BookingParty::Booker(user_id) => b.booker_id == user_id,
                BookingParty::Owner(user_id) => b.owner_id == user_id,
            })
            .filter(|b| query.matches_bucket(b))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(result
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn last_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| {
                b.item_id == item_id && b.status != BookingStatus::Rejected && b.start <= now
            })
            .max_by_key(|b| b.start)
            .cloned())
    }

    async fn next_for_item(
        &self,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.item_id == item_id && b.status != BookingStatus::Rejected && b.start > now)
            .min_by_key(|b| b.start)
            .cloned())
    }

    async fn has_begun_booking(
        &self,
        booker_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> BookingResult<bool> {
        let bookings = self.bookings.read().await;
        Ok(bookings.values().any(|b| {
            b.booker_id == booker_id
                && b.item_id == item_id
                && b.status != BookingStatus::Rejected
                && b.start <= now
        }))
    }
}
