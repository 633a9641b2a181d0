// crates/network/src/error.rs
//! Error types for network operations

use storyreel_core::AppError;
use thiserror::Error;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur during network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport-level failure reported by the HTTP stack
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Body could not be decoded
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Operation timed out")]
    Timeout,
}

impl NetworkError {
    /// Returns true if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Timeout => true,
            NetworkError::Http(e) => !e.is_builder() && !e.is_decode(),
            NetworkError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the error is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => (400..500).contains(status),
            NetworkError::Http(e) => e.status().is_some_and(|s| s.is_client_error()),
            _ => false,
        }
    }

    /// Returns true if the error is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => *status >= 500,
            NetworkError::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }
}

impl From<NetworkError> for AppError {
    fn from(error: NetworkError) -> Self {
        match error {
            NetworkError::Http(e) if e.is_timeout() => AppError::NetworkTimeout {
                operation: e
                    .url()
                    .map(|url| format!("GET {}", url))
                    .unwrap_or_else(|| "request".to_string()),
                seconds: 0,
            },
            NetworkError::Http(e) => AppError::network("request failed", e),
            NetworkError::Status { status, url } => AppError::HttpStatus { status, url },
            NetworkError::Io(e) => AppError::from(e),
            NetworkError::InvalidUrl(url) => AppError::InvalidUrl { url },
            NetworkError::InvalidResponse { url, reason } => AppError::InvalidStoryResponse {
                source_name: url,
                details: reason,
            },
            NetworkError::Timeout => AppError::NetworkTimeout {
                operation: "request".to_string(),
                seconds: 0,
            },
        }
    }
}
