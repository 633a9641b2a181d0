//! Configuration manager, the main API for config operations

use crate::likes::{LikeStore, LIKES_FILE_NAME};
use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_LOG_LEVEL: &str = "STORYREEL_APP_LOG_LEVEL";
pub const ENV_BASE_URL: &str = "STORYREEL_NETWORK_BASE_URL";
pub const ENV_SEGMENT_DURATION: &str = "STORYREEL_PLAYBACK_SEGMENT_DURATION_MS";

/// Loads, saves and resets the config file
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform config directory
    ///
    /// - Linux: `~/.config/storyreel/`
    /// - macOS: `~/Library/Application Support/com.DrTomLLC.StoryReel/`
    /// - Windows: `%APPDATA%\DrTomLLC\StoryReel\config\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self::with_directory(config_dir))
    }

    pub fn with_directory(config_dir: PathBuf) -> Self {
        let persistence = ConfigPersistence::new(config_dir.join(CONFIG_FILE_NAME));
        Self {
            persistence,
            config_dir,
        }
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("com", "DrTomLLC", "StoryReel")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Path {
        self.persistence.path()
    }

    pub fn likes_path(&self) -> PathBuf {
        self.config_dir.join(LIKES_FILE_NAME)
    }

    /// Opens the per-story like flags stored beside the config
    pub fn likes(&self) -> ConfigResult<LikeStore> {
        LikeStore::open(self.likes_path())
    }

    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the config, logging and falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, modifies and saves the config in one step
    ///
    /// ```rust,no_run
    /// # use storyreel_config::ConfigManager;
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.playback.segment_duration_ms = 5000;
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes the defaults unless a config file already exists
    ///
    /// Returns whether a file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Lists the validation problems of the stored config
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the config and applies `STORYREEL_SECTION_FIELD` overrides
    ///
    /// Unparseable values are logged and ignored.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        Ok(config)
    }
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        match value.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
        }
    }

    if let Some(value) = lookup(ENV_BASE_URL) {
        config.network.base_url = value;
    }

    if let Some(value) = lookup(ENV_SEGMENT_DURATION) {
        match value.parse::<u64>() {
            Ok(ms) => config.playback.segment_duration_ms = ms,
            Err(e) => log::warn!("Ignoring {}: {}", ENV_SEGMENT_DURATION, e),
        }
    }
}
