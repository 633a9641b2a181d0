//! Image cache settings

use crate::validation::{ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Overrides the platform cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self {
            enabled: true,
            directory: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSection for CacheConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        match &self.directory {
            Some(dir) if dir.as_os_str().is_empty() => Err(vec![ValidationError::new(
                "cache.directory",
                "must not be empty when set",
            )]),
            _ => Ok(()),
        }
    }

    fn merge(&mut self, other: Self) {
        self.enabled = other.enabled;
        if other.directory.is_some() {
            self.directory = other.directory;
        }
    }

    fn section_name(&self) -> &'static str {
        "cache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory_rejected() {
        let config = CacheConfig {
            enabled: true,
            directory: Some(PathBuf::new()),
        };
        assert!(config.validate().is_err());
        assert!(CacheConfig::new().validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_directory_when_unset() {
        let mut base = CacheConfig {
            enabled: true,
            directory: Some(PathBuf::from("/var/cache/storyreel")),
        };
        base.merge(CacheConfig {
            enabled: false,
            directory: None,
        });
        assert!(!base.enabled);
        assert_eq!(base.directory, Some(PathBuf::from("/var/cache/storyreel")));
    }
}
