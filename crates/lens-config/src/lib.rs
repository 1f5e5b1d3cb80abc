//! # lens-config
//!
//! Layered configuration loading for uxlens using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`UXLENS_*` prefix, `__` as separator)
//! 2. Project-level `.uxlens/config.toml`
//! 3. User-level `~/.config/uxlens/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `UXLENS_API__BASE_URL` -> `api.base_url`,
//! `UXLENS_CHAT__WELCOME_MESSAGE` -> `chat.welcome_message`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lens_config::LensConfig;
//!
//! let config = LensConfig::load_with_dotenv(|figment| figment).expect("config");
//! println!("analysis service: {}", config.api.endpoint("analyze"));
//! ```

mod api;
mod chat;
mod error;

pub use api::ApiConfig;
pub use chat::ChatConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every config key.
pub const ENV_PREFIX: &str = "UXLENS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LensConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl LensConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(std::convert::identity)
    }

    /// Like [`Self::load`], with `customize` applied to the provider chain
    /// before extraction. Providers merged there take precedence over every
    /// standard source, which is how command-line overrides are layered in.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with(customize: impl FnOnce(Figment) -> Figment) -> Result<Self, ConfigError> {
        let config: Self = customize(Self::figment()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` first, then behave like [`Self::load_with`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] for an unreadable or malformed `.env`
    /// file, otherwise the same as [`Self::load`]. A missing `.env` is fine.
    pub fn load_with_dotenv(
        customize: impl FnOnce(Figment) -> Figment,
    ) -> Result<Self, ConfigError> {
        Self::load_dotenv()?;
        Self::load_with(customize)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".uxlens/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check every section for values the client cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("uxlens").join("config.toml"))
    }

    /// Load `.env` from the current directory or the nearest ancestor that
    /// has one.
    fn load_dotenv() -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(()),
            Err(error) if error.not_found() => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LensConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: LensConfig = LensConfig::figment().extract()?;
            assert_eq!(config.api.path_prefix, "/api/v1");
            assert_eq!(
                config.chat.locked_message,
                "Run an analysis to unlock the assistant."
            );
            Ok(())
        });
    }
}
