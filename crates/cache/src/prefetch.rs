// crates/cache/src/prefetch.rs
//! Warms an image cache ahead of playback

use crate::error::CacheResult;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use storyreel_core::{ImageCache, StoryItem};
use storyreel_network::Client;

/// Downloads running at once during a batch prefetch
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    pub downloaded: usize,
    pub already_cached: usize,
    pub failed: usize,
}

impl PrefetchReport {
    pub fn total(&self) -> usize {
        self.downloaded + self.already_cached + self.failed
    }
}

pub struct ImagePrefetcher<C: ImageCache> {
    client: Client,
    cache: Arc<C>,
    concurrency: usize,
}

impl<C: ImageCache> ImagePrefetcher<C> {
    pub fn new(client: Client, cache: Arc<C>) -> Self {
        Self {
            client,
            cache,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Downloads and stores `url` unless it is already cached.
    /// Returns true if a download happened.
    pub async fn prefetch(&self, url: &str) -> CacheResult<bool> {
        if self.cache.contains(url) {
            return Ok(false);
        }
        let bytes = self.client.get_bytes(url).await?;
        self.cache.put(url, &bytes);
        Ok(true)
    }

    /// Prefetches every item's image; failures are counted, not returned
    pub async fn prefetch_items(&self, items: &[StoryItem]) -> PrefetchReport {
        let outcomes: Vec<CacheResult<bool>> = stream::iter(items)
            .map(|item| self.prefetch(&item.source_ref))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = PrefetchReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(true) => report.downloaded += 1,
                Ok(false) => report.already_cached += 1,
                Err(e) => {
                    log::warn!("Image prefetch failed: {}", e);
                    report.failed += 1;
                }
            }
        }
        report
    }
}
