use std::env;

use log::{debug, error, info};

use crate::error::{BotError, Result};
use crate::types::ChatRef;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub group_id: ChatRef,
    pub port: u16,
    /// Only shown by `/status`
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name))
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> std::result::Result<String, env::VarError>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .and_then(|value| {
                    if value.trim().is_empty() {
                        Err(env::VarError::NotPresent)
                    } else {
                        Ok(value)
                    }
                })
                .map_err(|source| {
                    error!("{name} is not set in the environment");
                    BotError::EnvVar { name, source }
                })
        };

        let telegram_token = required("TELEGRAM_BOT_TOKEN")?;

        let group_id = required("GROUP_ID")?.parse::<ChatRef>().map_err(|e| {
            error!("Failed to parse GROUP_ID: {}", e);
            e
        })?;

        // Blank optional values fall back to their defaults
        let optional = |name: &'static str| {
            lookup(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match optional("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| {
                error!("Failed to parse PORT {:?}: {}", value, e);
                BotError::Config(format!("invalid PORT {value:?}: {e}"))
            })?,
            None => DEFAULT_PORT,
        };

        let environment =
            optional("NODE_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        info!("Configuration loaded successfully");
        debug!(
            "Telegram token length: {} characters",
            telegram_token.len()
        );
        debug!("Group: {}", group_id);
        debug!("Port: {}", port);
        debug!("Environment: {}", environment);

        Ok(Self {
            telegram_token,
            group_id,
            port,
            environment,
        })
    }
}
