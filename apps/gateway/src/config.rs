//! Configuration for the Lendit Gateway

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Base URL of the upstream Lendit API
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;

        let api_url = std::env::var("LENDIT_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            api_url,
        })
    }
}
