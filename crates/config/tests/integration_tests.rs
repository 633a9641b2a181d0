//! Integration tests for the configuration system

use std::fs;
use storyreel_config::{
    CacheConfig, Config, ConfigError, ConfigManager, ConfigSection, LogLevel, NetworkConfig,
    PlaybackConfig, CONFIG_VERSION,
};
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf());
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    assert!(manager.initialize()?);

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);

    let mut modified = config.clone();
    modified.playback.segment_duration_ms = 8000;
    modified.app.log_level = LogLevel::Debug;
    modified.cache.enabled = false;
    manager.save(&modified)?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded, modified);

    manager.reset()?;
    assert_eq!(manager.load()?, Config::default());

    Ok(())
}

#[test]
fn test_hand_written_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(
        manager.config_path(),
        r#"
[app]
log_level = "warn"

[playback]
segment_duration_ms = 5000
tick_ms = 33

[network]
base_url = "https://stories.example.com"

[cache]
directory = "/tmp/storyreel-images"
"#,
    )?;

    let config = manager.load()?;
    assert_eq!(config.app.log_level, LogLevel::Warn);
    assert_eq!(config.playback.segment_duration_ms, 5000);
    assert_eq!(config.playback.tick_ms, 33);
    assert_eq!(config.playback.scroll_animation_ms, 300);
    assert_eq!(config.network.base_url, "https://stories.example.com");
    assert_eq!(config.network.timeout_secs, 30);
    assert!(config.cache.enabled);
    assert!(config.validate().is_ok());

    Ok(())
}

#[test]
fn test_invalid_config_is_never_written() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let mut invalid = Config::default();
    invalid.network.base_url = "stories.example.com".to_string();
    let result = manager.save(&invalid);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_corrupted_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "this is not valid TOML {{{")?;

    assert!(manager.load().is_err());
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().join("a").join("b"));

    manager.save(&Config::default())?;
    assert!(manager.config_path().exists());

    Ok(())
}

#[test]
fn test_no_temp_files_left_behind() -> Result<(), Box<dyn std::error::Error>> {
    let (temp_dir, manager) = setup_test_manager()?;

    for ms in [1000, 2000, 3000] {
        manager.update(|config| config.playback.segment_duration_ms = ms)?;
    }

    let entries: Vec<_> = fs::read_dir(temp_dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(manager.load()?.playback.segment_duration_ms, 3000);

    Ok(())
}

#[test]
fn test_all_sections_default_are_valid() {
    assert!(PlaybackConfig::default().validate().is_ok());
    assert!(NetworkConfig::default().validate().is_ok());
    assert!(CacheConfig::default().validate().is_ok());
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_serialization_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let original = Config::default();
    let toml_string = toml::to_string(&original)?;
    let deserialized: Config = toml::from_str(&toml_string)?;
    assert_eq!(original, deserialized);
    Ok(())
}

#[test]
fn test_multiple_validation_errors_collected() {
    let mut config = Config::default();
    config.playback.segment_duration_ms = 0;
    config.network.max_attempts = 0;
    config.cache.directory = Some(Default::default());

    let errors = config.validate().unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field.clone()).collect();
    assert_eq!(
        fields,
        vec![
            "playback.segment_duration_ms",
            "network.max_attempts",
            "cache.directory"
        ]
    );
}

#[test]
fn test_likes_survive_config_reset() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;

    let mut likes = manager.likes()?;
    assert!(likes.toggle(3)?);
    assert_eq!(likes.path(), manager.likes_path().as_path());

    manager.reset()?;
    assert!(manager.likes()?.is_liked(3));
    Ok(())
}
