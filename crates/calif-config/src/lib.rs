//! # calif-config
//!
//! Layered configuration loading for calif using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CALIF_*` prefix, `__` as separator)
//! 2. Project-level `./calif.toml`
//! 3. User-level `~/.config/calif/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CALIF_PATHS__SUBMISSIONS_ROOT` -> `paths.submissions_root`,
//! `CALIF_REVIEW__OPEN_FILES` -> `review.open_files`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use calif_config::CalifConfig;
//!
//! let config = CalifConfig::load_with_dotenv().expect("config");
//!
//! if config.paths.is_configured() {
//!     println!("Submissions: {}", config.paths.submissions_root);
//! }
//! ```

mod error;
mod general;
mod paths;
mod review;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use paths::PathsConfig;
pub use review::ReviewConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "calif.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalifConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CalifConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source fails to parse or a value is
    /// invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CALIF_").split("__"))
    }

    /// Reject values that would silently match nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty or dotted audio
    /// extension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for extension in &self.review.audio_extensions {
            if extension.trim().is_empty() || extension.contains(['.', '/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "review.audio_extensions".to_string(),
                    reason: format!("'{extension}' must be a bare extension such as \"mp3\""),
                });
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("calif").join("config.toml"))
    }
}
