//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `HANDSHAKE_TOUR` prefix and nested values use double underscores as separators.
//!
//! Every setting has a default, so an empty environment yields a working
//! (offline) configuration.
//!
//! # Example
//!
//! ```no_run
//! use handshake_tour::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Advancing every {:?}", config.playback.interval());
//! ```

mod ai;
mod error;
mod logging;
mod playback;

pub use ai::{AiConfig, ProviderKind};
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use playback::PlaybackConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Text-generation provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Auto-advance timing
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HANDSHAKE_TOUR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HANDSHAKE_TOUR__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `HANDSHAKE_TOUR__PLAYBACK__INTERVAL_MS=3500` -> `playback.interval_ms = 3500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HANDSHAKE_TOUR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    /// A missing API key is never an error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.playback.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
