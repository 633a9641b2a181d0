//! StoryReel core: domain types, errors and collaborator capabilities

pub mod collaborators;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use collaborators::{Haptics, ImageCache, NoHaptics, StorySource};
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    CollectionId, Story, StoryCollection, StoryCollectionResponse, StoryCollectionsResponse,
    StoryItem, Timestamp, Validator,
};
