//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the `PARLEY`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use parley::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod error;
mod rooms;
mod server;
mod translation;

pub use error::{ConfigError, ValidationError};
pub use rooms::RoomsConfig;
pub use server::{Environment, ServerConfig};
pub use translation::TranslationConfig;

use serde::Deserialize;

/// Root application configuration.
///
/// Every section has usable defaults: the service starts with no
/// environment at all, degrading translation to pass-through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Room lifecycle configuration (expiry TTL)
    #[serde(default)]
    pub rooms: RoomsConfig,

    /// Translation provider configuration (Groq)
    #[serde(default)]
    pub translation: TranslationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present (for development), then reads
    /// environment variables with the `PARLEY` prefix, e.g.
    /// `PARLEY__SERVER__PORT=8080` -> `server.port = 8080`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PARLEY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.rooms.validate()?;
        self.translation.validate()?;
        Ok(())
    }
}
