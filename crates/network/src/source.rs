// crates/network/src/source.rs
//! Story sources: the HTTP endpoint and local fixture files

use crate::client::{parse_url, Client};
use crate::error::NetworkResult;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use storyreel_core::{AppError, Result, StoryCollection, StoryCollectionsResponse, StorySource};

/// Path of the collections endpoint below the base URL
pub const STORIES_PATH: &str = "stories";

/// Decodes the `{"storyCollections": [...]}` document
pub fn parse_story_collections(source_name: &str, body: &[u8]) -> Result<Vec<StoryCollection>> {
    let response: StoryCollectionsResponse =
        serde_json::from_slice(body).map_err(|e| AppError::InvalidStoryResponse {
            source_name: source_name.to_string(),
            details: e.to_string(),
        })?;
    Ok(response.into_collections())
}

/// Fetches collections from `GET {base_url}/stories`
pub struct HttpStorySource {
    client: Client,
    endpoint: String,
}

impl HttpStorySource {
    pub fn new(client: Client, base_url: &str) -> NetworkResult<Self> {
        let endpoint = format!("{}/{}", base_url.trim_end_matches('/'), STORIES_PATH);
        parse_url(&endpoint)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl StorySource for HttpStorySource {
    fn fetch_story_collections(&self) -> BoxFuture<'_, Result<Vec<StoryCollection>>> {
        Box::pin(async move {
            log::debug!("Fetching story collections from {}", self.endpoint);
            let body = self.client.get_bytes(&self.endpoint).await?;
            parse_story_collections(&self.endpoint, &body)
        })
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

/// Reads collections from a JSON file in the endpoint's format
pub struct FileStorySource {
    path: PathBuf,
    name: String,
}

impl FileStorySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorySource for FileStorySource {
    fn fetch_story_collections(&self) -> BoxFuture<'_, Result<Vec<StoryCollection>>> {
        Box::pin(async move {
            let body = tokio::fs::read(&self.path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::FileNotFound {
                        path: self.path.clone(),
                    }
                } else {
                    AppError::from(e)
                }
            })?;
            parse_story_collections(&self.name, &body)
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
