//! Error types and recovery strategies for StoryReel
//!
//! Errors are classified into three severity tiers:
//! - **Recoverable**: Can be retried (network timeouts, transient HTTP failures)
//! - **Degraded**: Feature unavailable but the app continues (cache, bad payload)
//! - **Fatal**: Requires user intervention (corrupted configuration)
//!
//! The playback state machine never produces errors; everything here belongs
//! to the collaborators around it (story source, image cache, configuration).

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation immediately (e.g., dropped connection)
    RetryImmediate,
    /// Retry with exponential backoff (e.g., server temporarily unavailable)
    RetryWithBackoff,
    /// Disable the failing feature and continue (e.g., image cache)
    DisableFeature,
    /// Reset the affected settings to defaults
    ResetToDefaults,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryImmediate => write!(f, "Retrying immediately"),
            Self::RetryWithBackoff => write!(f, "Retrying with backoff"),
            Self::DisableFeature => write!(f, "Disabling feature"),
            Self::ResetToDefaults => write!(f, "Resetting to defaults"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Feature degraded but app can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for StoryReel
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Network Errors =====
    /// Network request failed
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network timeout
    #[error("Network timeout after {seconds}s: {operation}")]
    NetworkTimeout { operation: String, seconds: u64 },

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    // ===== Story Source Errors =====
    /// Story source answered with a payload we cannot decode
    #[error("Invalid story response from {source_name}: {details}")]
    InvalidStoryResponse { source_name: String, details: String },

    // ===== Cache Errors =====
    /// Cache write failed
    #[error("Cache write failed: {reason}")]
    CacheWriteFailed { reason: String },

    /// Cache entry unreadable
    #[error("Cache corrupted at {path}: {reason}")]
    CacheCorrupted { path: PathBuf, reason: String },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    /// Configuration file corrupted
    #[error("Configuration corrupted: {path}")]
    ConfigurationCorrupted { path: PathBuf },

    // ===== File System Errors =====
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Generic Errors =====
    /// Operation cancelled
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NetworkError { .. } | Self::NetworkTimeout { .. } => ErrorSeverity::Recoverable,
            Self::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Recoverable,

            Self::ConfigurationCorrupted { .. } => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::NetworkTimeout { .. } => RecoveryAction::RetryImmediate,
            Self::NetworkError { .. } => RecoveryAction::RetryWithBackoff,
            Self::HttpStatus { status, .. } if *status >= 500 => RecoveryAction::RetryWithBackoff,

            Self::CacheWriteFailed { .. } | Self::CacheCorrupted { .. } => {
                RecoveryAction::DisableFeature
            }

            Self::InvalidConfiguration { .. } | Self::ConfigurationCorrupted { .. } => {
                RecoveryAction::ResetToDefaults
            }

            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for the collection list
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkError { .. } | Self::NetworkTimeout { .. } => {
                "Cannot connect to the internet. Please check your connection.".to_string()
            }
            Self::HttpStatus { status, .. } if *status >= 500 => {
                "The story service is having trouble. Please try again later.".to_string()
            }
            Self::HttpStatus { .. } => "Stories could not be loaded.".to_string(),
            Self::InvalidUrl { .. } => "The story service address is not valid.".to_string(),
            Self::InvalidStoryResponse { .. } => {
                "Received invalid data from the server.".to_string()
            }
            Self::CacheWriteFailed { .. } => {
                "Cannot save images offline. Loading may be slower.".to_string()
            }
            Self::CacheCorrupted { .. } => "Image cache is corrupted and will be cleared.".to_string(),
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::ConfigurationCorrupted { .. } => {
                "App settings are corrupted. Resetting to defaults...".to_string()
            }
            Self::FileNotFound { .. } => "The file was not found.".to_string(),
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::Cancelled { .. } => "Operation was cancelled.".to_string(),
            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Returns true if this error can be automatically retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.recovery_action(),
            RecoveryAction::RetryImmediate | RecoveryAction::RetryWithBackoff
        )
    }

    /// Helper to create a network error from any error type
    pub fn network<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound {
                path: PathBuf::from("unknown"),
            },
            _ => Self::IoError {
                message: err.to_string(),
                source: err,
            },
        }
    }
}
