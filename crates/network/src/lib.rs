// crates/network/src/lib.rs
//! Network utilities: HTTP client with retries and story sources

mod client;
mod error;
mod retry;
mod source;

pub use client::{parse_url, Client, ClientConfig};
pub use error::{NetworkError, NetworkResult};
pub use retry::RetryPolicy;
pub use source::{parse_story_collections, FileStorySource, HttpStorySource, STORIES_PATH};
