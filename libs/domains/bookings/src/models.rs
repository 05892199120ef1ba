use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a booking: created waiting, then decided exactly once
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "booking_status")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Awaiting the owner's decision
    #[default]
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    /// Approved by the item's owner
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected by the item's owner
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Query bucket for booking listings, matched case-sensitively
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SearchState {
    #[default]
    All,
    /// start <= now <= end, status ignored
    Current,
    /// end < now
    Past,
    /// start > now
    Future,
    /// status WAITING, time ignored
    Waiting,
    /// status REJECTED, time ignored
    Rejected,
}

/// A booking of an item for a time span
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub item_id: Uuid,
    pub booker_id: Uuid,
    /// Snapshot of the item's owner at creation; owners never change
    pub owner_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A validated booking ready to be persisted with status WAITING
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub item_id: Uuid,
    pub booker_id: Uuid,
    pub owner_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Whose bookings a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    /// Bookings made by this user
    Booker(Uuid),
    /// Bookings of items owned by this user
    Owner(Uuid),
}

/// Resolved listing query handed to the repository
#[derive(Debug, Clone, PartialEq)]
pub struct BookingQuery {
    pub party: BookingParty,
    pub bucket: SearchState,
    /// Single instant all time buckets are classified against
    pub now: DateTime<Utc>,
    pub offset: u64,
    pub limit: u64,
}

impl BookingQuery {
    /// Whether a booking falls into this query's bucket at `self.now`
    pub fn matches_bucket(&self, booking: &Booking) -> bool {
        match self.bucket {
            SearchState::All => true,
            SearchState::Current => booking.start <= self.now && self.now <= booking.end,
            SearchState::Past => booking.end < self.now,
            SearchState::Future => booking.start > self.now,
            SearchState::Waiting => booking.status == BookingStatus::Waiting,
            SearchState::Rejected => booking.status == BookingStatus::Rejected,
        }
    }
}

/// Raw query parameters for booking listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct ListParams {
    /// Bucket name; defaults to ALL
    pub state: Option<String>,

    /// Row offset to start from
    #[serde(default)]
    pub from: u64,

    /// Maximum number of bookings to return
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    20
}
