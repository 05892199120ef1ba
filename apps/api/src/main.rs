//! Lendit API - rental marketplace REST server

use axum_helpers::server::{close_postgres, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod adapters;
mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL at {}", config.postgres.url());

    let db =
        database::postgres::connect_from_config_with_retry(config.postgres.clone(), None).await?;

    info!("Successfully connected to PostgreSQL");

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting Lendit API on port {}", state.config.server.port);

    create_production_app(app, &state.config.server, Duration::from_secs(30), {
        let db = state.db.clone();
        async move {
            info!("Shutting down: closing PostgreSQL connection");
            close_postgres(db, "lendit").await;
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Lendit API shutdown complete");
    Ok(())
}
