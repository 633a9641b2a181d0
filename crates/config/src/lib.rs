//! StoryReel configuration
//!
//! The config file is a TOML document with one table per section. Each
//! section implements [`ConfigSection`], validates itself and falls back to
//! its defaults for missing keys.
//!
//! ```rust,no_run
//! use storyreel_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! println!("Segment: {:?}", config.playback.segment_duration());
//! ```

mod error;
mod likes;
mod manager;
mod persistence;
mod validation;

pub mod app_config;
pub mod cache_config;
pub mod network_config;
pub mod playback_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use likes::{LikeStore, LIKES_FILE_NAME};
pub use manager::{ConfigManager, ENV_BASE_URL, ENV_LOG_LEVEL, ENV_SEGMENT_DURATION};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use cache_config::CacheConfig;
pub use network_config::NetworkConfig;
pub use playback_config::PlaybackConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub app: AppConfig,
    pub playback: PlaybackConfig,
    pub network: NetworkConfig,
    pub cache: CacheConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section and returns all problems found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.playback.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.network.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.cache.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Renders the config as it is written to disk
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merges `other` into this config, preferring its values
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.playback.merge(other.playback);
        self.network.merge(other.network);
        self.cache.merge(other.cache);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            playback: PlaybackConfig::default(),
            network: NetworkConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}
