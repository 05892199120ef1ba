//! Items Domain
//!
//! This module provides a complete domain implementation for marketplace
//! item listings, including text search and post-rental comments.
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
//! │ Repository  │     │ Collaborators │  ← users/bookings lookups
//! └──────┬──────┘     └───────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! The service never reaches into other domains' tables directly; the
//! composing application wires `UserDirectory` and `BookingLookup`
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
pub use collaborators::{BookingLookup, UserDirectory};
pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use models::{
    BookingBrief, Comment, CommentRecord, CreateComment, CreateItem, Item, ItemFilter,
    ItemWithDetails, SearchFilter, UpdateItem,
};
pub use postgres::PgItemRepository;
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
