//! Story and story-collection domain models
//!
//! `Story` is what the story endpoint returns; `StoryCollection` groups the
//! stories shown as one pager. The wire types mirror the endpoint payload:
//!
//! ```json
//! {"storyCollections": [{"name": "Macro", "stories": [
//!     {"id": 1, "name": "Alex", "profile_picture_url": "https://..."}
//! ]}]}
//! ```

use crate::types::{Timestamp, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single story as delivered by the story source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: u32,
    pub name: String,
    pub profile_picture_url: String,
}

impl Validator for Story {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.id == 0 {
            errors.push("Story id must be positive".to_string());
        }

        if self.name.trim().is_empty() {
            errors.push("Story name must not be empty".to_string());
        }

        if self.profile_picture_url.trim().is_empty() {
            errors.push("Story picture reference must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Unique identifier for a story collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionId(Uuid);

impl CollectionId {
    /// Creates a new random CollectionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CollectionId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A curated group of stories, opened as one story pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCollection {
    pub id: CollectionId,
    pub display_name: String,
    pub created_at: Timestamp,
    pub stories: Vec<Story>,
}

impl StoryCollection {
    /// Creates a collection with a fresh id
    pub fn new(display_name: impl Into<String>, stories: Vec<Story>) -> Self {
        Self {
            id: CollectionId::new(),
            display_name: display_name.into(),
            created_at: Timestamp::now(),
            stories,
        }
    }

    /// Number of stories in the collection
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Returns true if the collection has no stories
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

/// Wire representation of one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCollectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub stories: Vec<Story>,
}

/// Wire representation of the story endpoint payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCollectionsResponse {
    pub story_collections: Vec<StoryCollectionResponse>,
}

impl StoryCollectionsResponse {
    /// Converts the payload into domain collections
    ///
    /// Collections without a name are labelled by their 1-based position.
    pub fn into_collections(self) -> Vec<StoryCollection> {
        self.story_collections
            .into_iter()
            .enumerate()
            .map(|(position, response)| {
                let name = response
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| format!("Collection {}", position + 1));
                StoryCollection::new(name, response.stories)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u32) -> Story {
        Story {
            id,
            name: format!("Artist {}", id),
            profile_picture_url: format!("https://example.com/{}.jpg", id),
        }
    }

    #[test]
    fn test_story_validation() {
        assert!(story(1).is_valid());

        let invalid = Story {
            id: 0,
            name: " ".to_string(),
            profile_picture_url: String::new(),
        };
        assert_eq!(invalid.validate().unwrap_err().len(), 3);
    }

    #[test]
    fn test_collection_ids_are_unique() {
        let a = StoryCollection::new("A", vec![story(1)]);
        let b = StoryCollection::new("A", vec![story(1)]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_collection_id_roundtrip_string() {
        let id = CollectionId::new();
        let parsed = CollectionId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_wire_payload() {
        let json = r#"{
            "storyCollections": [
                {"name": "Macro", "stories": [
                    {"id": 1, "name": "Alex", "profile_picture_url": "https://example.com/1.jpg"},
                    {"id": 2, "name": "Dina", "profile_picture_url": "https://example.com/2.jpg"}
                ]},
                {"stories": [
                    {"id": 3, "name": "Blake", "profile_picture_url": "https://example.com/3.jpg"}
                ]}
            ]
        }"#;

        let response: StoryCollectionsResponse = serde_json::from_str(json).unwrap();
        let collections = response.into_collections();

        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].display_name, "Macro");
        assert_eq!(collections[0].len(), 2);
        assert_eq!(collections[1].display_name, "Collection 2");
        assert_eq!(collections[1].stories[0].name, "Blake");
    }

    #[test]
    fn test_blank_name_falls_back_to_position() {
        let response = StoryCollectionsResponse {
            story_collections: vec![StoryCollectionResponse {
                name: Some("  ".to_string()),
                stories: vec![],
            }],
        };
        let collections = response.into_collections();
        assert_eq!(collections[0].display_name, "Collection 1");
        assert!(collections[0].is_empty());
    }
}
