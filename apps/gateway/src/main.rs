//! Lendit Gateway - validating edge in front of the Lendit API

use axum::middleware;
use axum_helpers::security_headers;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

mod client;
mod config;
mod routes;

use client::ApiClient;
use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let client = ApiClient::new(config.api_url.clone());

    let app = routes::router(client)
        .merge(health_router(config.app))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(security_headers));

    info!(
        "Starting Lendit Gateway on port {}, forwarding to {}",
        config.server.port, config.api_url
    );

    create_production_app(app, &config.server, Duration::from_secs(30), async {
        info!("Gateway shutdown complete");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    Ok(())
}
