//! Shared application state

use crate::config::Config;
use sea_orm::DatabaseConnection;

/// State shared across the API routers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
}
