//! Custom extractors for Axum handlers.
//!
//! This module provides reusable extractors that reduce boilerplate
//! and standardize error handling across your API.

pub mod acting_user;
pub mod uuid_path;
pub mod validated_json;

pub use acting_user::{ActingUser, USER_ID_HEADER};
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
