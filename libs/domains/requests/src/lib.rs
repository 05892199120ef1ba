//! Item Requests Domain
//!
//! This module provides a complete domain implementation for item requests:
//! users asking the marketplace for items nobody has listed yet, and the
//! items later posted as answers.
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
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! The service never reaches into other domains' tables directly; the
//! composing application wires `UserDirectory` and `ItemProvider`
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
pub use collaborators::{ItemProvider, UserDirectory};
pub use error::{RequestError, RequestResult};
pub use handlers::ApiDoc;
pub use models::{AnsweringItem, CreateItemRequest, ItemRequest, RequestFilter, RequestWithItems};
pub use postgres::PgRequestRepository;
pub use repository::{InMemoryRequestRepository, RequestRepository};
pub use service::RequestService;
