//! Capabilities injected into features and sessions
//!
//! Each collaborator is passed explicitly to whoever needs it; nothing here
//! is a process-wide singleton.

use crate::error::Result;
use crate::types::StoryCollection;
use bytes::Bytes;
use futures::future::BoxFuture;

/// Source of story collections (HTTP endpoint, fixture file, test double)
pub trait StorySource: Send + Sync {
    /// Fetches every collection the source knows about
    fn fetch_story_collections(&self) -> BoxFuture<'_, Result<Vec<StoryCollection>>>;

    /// Short name used in logs and error messages
    fn name(&self) -> &str;
}

/// Side table of image bytes keyed by a stable hash of the source reference
///
/// The playback state machine never consults the cache.
pub trait ImageCache: Send + Sync {
    /// Returns the cached bytes for a source reference, if present
    fn get(&self, source_ref: &str) -> Option<Bytes>;

    /// Stores bytes for a source reference
    fn put(&self, source_ref: &str, bytes: &[u8]);

    /// Returns true if an entry exists for the source reference
    fn contains(&self, source_ref: &str) -> bool {
        self.get(source_ref).is_some()
    }
}

/// Selection-change feedback fired when the user pages between stories
pub trait Haptics: Send + Sync {
    fn trigger(&self);
}

/// Haptics for hosts without a feedback device
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn trigger(&self) {}
}
