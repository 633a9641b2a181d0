// crates/network/src/client.rs
//! HTTP client wrapper with retries

use crate::error::{NetworkError, NetworkResult};
use crate::retry::RetryPolicy;
use bytes::Bytes;
use reqwest::{Client as ReqwestClient, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    pub retry_policy: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("StoryReel/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
            retry_policy: RetryPolicy::new(3).with_initial_delay(Duration::from_millis(100)),
        }
    }
}

/// HTTP client that retries transient failures
#[derive(Clone)]
pub struct Client {
    inner: ReqwestClient,
    config: ClientConfig,
}

impl Client {
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(NetworkError::Http)?;

        Ok(Self {
            inner: client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs a GET request, failing on non-success status codes
    pub async fn get(&self, url: &str) -> NetworkResult<Response> {
        let url = parse_url(url)?;
        self.request(&url).await
    }

    /// Downloads a whole body into memory
    pub async fn get_bytes(&self, url: &str) -> NetworkResult<Bytes> {
        let response = self.get(url).await?;
        response.bytes().await.map_err(NetworkError::Http)
    }

    /// Fetches and decodes a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> NetworkResult<T> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| NetworkError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn request(&self, url: &Url) -> NetworkResult<Response> {
        let policy = &self.config.retry_policy;
        let mut attempts = 0;

        loop {
            attempts += 1;

            let error = match self.inner.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => NetworkError::Status {
                    status: response.status().as_u16(),
                    url: url.to_string(),
                },
                Err(e) if e.is_timeout() => NetworkError::Timeout,
                Err(e) => NetworkError::Http(e),
            };

            // Client errors (4xx) are never retried
            if !error.is_retryable() || !policy.has_attempts_left(attempts) {
                return Err(error);
            }

            let delay = policy.delay_for_attempt(attempts);
            log::warn!(
                "GET {} failed (attempt {}/{}): {}; retrying in {:?}",
                url,
                attempts,
                policy.max_attempts(),
                error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Parses an absolute http(s) URL
pub fn parse_url(url: &str) -> NetworkResult<Url> {
    let parsed = Url::parse(url).map_err(|_| NetworkError::InvalidUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(NetworkError::InvalidUrl(url.to_string())),
    }
}
