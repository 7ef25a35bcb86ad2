//! Configuration for the stock gateway connection
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with STOCKLEDGER_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Connection settings for the remote stock gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API, e.g. `https://api.example.com/api`.
    pub base_url: String,

    /// Bearer token attached to every request when present.
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl GatewayConfig {
    /// Load configuration from files and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            std::env::var("STOCKLEDGER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("base_url", "http://localhost:8000/api")?
            .set_default("timeout_seconds", 30)?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::with_prefix("STOCKLEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            timeout_seconds: 30,
        }
    }
}
