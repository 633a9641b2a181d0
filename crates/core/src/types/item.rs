//! Story items: the segments of a story pager

use crate::types::{Story, StoryCollection};
use serde::{Deserialize, Serialize};

/// Narrowest thumbnail aspect ratio (width / height)
pub const MIN_ASPECT_RATIO: f64 = 0.6;
/// Widest thumbnail aspect ratio (width / height)
pub const MAX_ASPECT_RATIO: f64 = 0.9;

/// One displayable segment of a collection
///
/// Items are built once when a collection is loaded and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryItem {
    pub id: u32,
    pub story: Story,
    pub seed: String,
    pub aspect_ratio: f64,
    pub source_ref: String,
}

impl StoryItem {
    /// Creates an item for a story
    pub fn new(story: Story) -> Self {
        let seed = format!("story_{}", story.id);
        let aspect_ratio = aspect_ratio_for_seed(&seed);
        Self {
            id: story.id,
            source_ref: story.profile_picture_url.clone(),
            story,
            seed,
            aspect_ratio,
        }
    }

    /// Builds the ordered item list of a collection
    pub fn from_collection(collection: &StoryCollection) -> Vec<Self> {
        collection.stories.iter().cloned().map(Self::new).collect()
    }
}

/// Maps a seed onto `[MIN_ASPECT_RATIO, MAX_ASPECT_RATIO]`
///
/// FNV-1a over the seed bytes; the value only has to be stable across runs.
fn aspect_ratio_for_seed(seed: &str) -> f64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in seed.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    let unit = (hash % 10_000) as f64 / 9_999.0;
    MIN_ASPECT_RATIO + unit * (MAX_ASPECT_RATIO - MIN_ASPECT_RATIO)
}
