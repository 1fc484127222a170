//! Application configuration

use api::ClientConfig;
use api::config::DEFAULT_BASE_URL;
use common::RedisConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::info;

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_NAMESPACE: &str = "money_manager";

/// Settings for the tracker binary
///
/// Sources, later ones winning:
/// - built-in defaults
/// - an optional `money-manager.{toml,yaml,json}` file in the working directory
/// - `MONEY_MANAGER_*` environment variables (e.g. `MONEY_MANAGER_API_BASE_URL`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub redis_url: String,
    pub store_namespace: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            store_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("api_base_url", DEFAULT_BASE_URL)?
            .set_default("redis_url", DEFAULT_REDIS_URL)?
            .set_default("store_namespace", DEFAULT_NAMESPACE)?
            .add_source(File::with_name("money-manager").required(false))
            .add_source(Environment::with_prefix("MONEY_MANAGER"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        if config.store_namespace.trim().is_empty() {
            return Err(ConfigError::Message(
                "store_namespace cannot be empty".to_string(),
            ));
        }

        info!("Backend: {}", config.api_base_url);
        info!("Store namespace: {}", config.store_namespace);
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
        }
    }

    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            url: self.redis_url.clone(),
            namespace: self.store_namespace.clone(),
        }
    }
}
