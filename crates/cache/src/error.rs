// crates/cache/src/error.rs
//! Error types for the image cache

use std::path::PathBuf;
use storyreel_core::AppError;
use storyreel_network::NetworkError;
use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine a cache directory")]
    NoCacheDirectory,

    #[error("Download failed: {0}")]
    Download(#[from] NetworkError),
}

impl From<CacheError> for AppError {
    fn from(error: CacheError) -> Self {
        match error {
            CacheError::Read { path, source } => AppError::CacheCorrupted {
                path,
                reason: source.to_string(),
            },
            CacheError::Download(e) => e.into(),
            other => AppError::CacheWriteFailed {
                reason: other.to_string(),
            },
        }
    }
}
