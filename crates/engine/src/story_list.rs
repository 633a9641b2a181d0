//! Story list: loads collections and prepares their playback items

use crate::feature::{Effect, Feature};
use crate::story::StoryFeature;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use storyreel_core::{AppError, CollectionId, StoryCollection, StoryItem, StorySource};
use tokio::time::Instant;

/// Progress of one remote request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoryListState {
    pub collections: RequestState<Vec<StoryCollection>>,
    pub error_message: Option<String>,
    pub items: HashMap<CollectionId, Vec<StoryItem>>,
    pub selected: Option<CollectionId>,
}

impl StoryListState {
    pub fn collection(&self, id: CollectionId) -> Option<&StoryCollection> {
        self.collections
            .value()
            .and_then(|collections| collections.iter().find(|c| c.id == id))
    }

    pub fn selected_collection(&self) -> Option<&StoryCollection> {
        self.selected.and_then(|id| self.collection(id))
    }

    /// Playback machine for a loaded collection
    pub fn open(&self, id: CollectionId) -> Option<StoryFeature> {
        self.items
            .get(&id)
            .map(|items| StoryFeature::from_items(items.clone()))
    }
}

pub enum StoryListAction {
    LoadStoryCollections,
    StoryCollectionsResponse(Result<Vec<StoryCollection>, AppError>),
    SelectCollection(Option<CollectionId>),
    ClearError,
}

impl fmt::Debug for StoryListAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadStoryCollections => write!(f, "LoadStoryCollections"),
            Self::StoryCollectionsResponse(Ok(collections)) => {
                write!(f, "StoryCollectionsResponse(Ok({} collections))", collections.len())
            }
            Self::StoryCollectionsResponse(Err(error)) => {
                write!(f, "StoryCollectionsResponse(Err({}))", error)
            }
            Self::SelectCollection(id) => f.debug_tuple("SelectCollection").field(id).finish(),
            Self::ClearError => write!(f, "ClearError"),
        }
    }
}

pub struct StoryListFeature {
    source: Arc<dyn StorySource>,
}

impl StoryListFeature {
    pub fn new(source: Arc<dyn StorySource>) -> Self {
        Self { source }
    }
}

impl Feature for StoryListFeature {
    type State = StoryListState;
    type Action = StoryListAction;

    fn initial_state(&self) -> StoryListState {
        StoryListState::default()
    }

    fn reduce(&self, state: &mut StoryListState, action: &StoryListAction, _now: Instant) {
        match action {
            StoryListAction::LoadStoryCollections => {
                state.collections = RequestState::Loading;
                state.error_message = None;
            }
            StoryListAction::StoryCollectionsResponse(Ok(collections)) => {
                log::info!("Loaded {} story collections", collections.len());
                state.items = collections
                    .iter()
                    .map(|collection| (collection.id, StoryItem::from_collection(collection)))
                    .collect();
                state.collections = RequestState::Success(collections.clone());
            }
            StoryListAction::StoryCollectionsResponse(Err(error)) => {
                log::warn!("Loading story collections failed: {}", error);
                let message = error.user_message();
                state.collections = RequestState::Failure(message.clone());
                state.error_message = Some(message);
            }
            StoryListAction::SelectCollection(id) => {
                state.selected = *id;
            }
            StoryListAction::ClearError => {
                state.error_message = None;
            }
        }
    }

    fn effect(
        &self,
        action: &StoryListAction,
        _state: &StoryListState,
        _now: Instant,
    ) -> Effect<StoryListAction> {
        match action {
            StoryListAction::LoadStoryCollections => {
                let source = Arc::clone(&self.source);
                Effect::task(async move {
                    log::debug!("Fetching story collections from {}", source.name());
                    let result = source.fetch_story_collections().await;
                    Some(StoryListAction::StoryCollectionsResponse(result))
                })
            }
            _ => Effect::None,
        }
    }
}
