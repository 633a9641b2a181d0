//! Domain types for StoryReel
//!
//! - `story`: Stories, collections and the story endpoint payload
//! - `item`: Story items, the segments of a story pager
//! - `common`: Shared traits and utilities

mod common;
mod item;
mod story;

pub use common::{Timestamp, Validator};
pub use item::{StoryItem, MAX_ASPECT_RATIO, MIN_ASPECT_RATIO};
pub use story::{
    CollectionId, Story, StoryCollection, StoryCollectionResponse, StoryCollectionsResponse,
};
