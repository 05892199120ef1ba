//! Bookings Domain
//!
//! The core of the marketplace: booking an item for a time span, the
//! owner's single-shot approve/reject decision, and state-bucketed
//! listings for bookers and owners.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌───────────────┐
//! │ Repository  │     │ Collaborators │  ← users/items lookups
//! └──────┬──────┘     └───────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! The service never reaches into other domains' tables directly; the
//! composing application wires `UserDirectory` and `ItemDirectory`
//! implementations over the respective domains.

pub mod collaborators;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use collaborators::{ItemDirectory, ItemSnapshot, UserDirectory};
pub use error::{BookingError, BookingResult};
pub use handlers::ApiDoc;
pub use models::{
    Booking, BookingParty, BookingQuery, BookingStatus, CreateBooking, ListParams, NewBooking,
    SearchState,
};
pub use postgres::PgBookingRepository;
pub use repository::{BookingRepository, InMemoryBookingRepository};
pub use service::BookingService;
