//! Story list loading through a running session

use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use storyreel_core::{AppError, Result, Story, StoryCollection, StorySource};
use storyreel_engine::{
    RequestState, Session, StoryAction, StoryListAction, StoryListFeature, UiCommand,
};

struct FixtureSource {
    collections: Vec<StoryCollection>,
}

impl StorySource for FixtureSource {
    fn fetch_story_collections(&self) -> BoxFuture<'_, Result<Vec<StoryCollection>>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(self.collections.clone())
        })
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

struct OfflineSource;

impl StorySource for OfflineSource {
    fn fetch_story_collections(&self) -> BoxFuture<'_, Result<Vec<StoryCollection>>> {
        Box::pin(async {
            Err(AppError::NetworkTimeout {
                operation: "fetch stories".to_string(),
                seconds: 30,
            })
        })
    }

    fn name(&self) -> &str {
        "offline"
    }
}

fn stories(ids: &[u32]) -> Vec<Story> {
    ids.iter()
        .map(|&id| Story {
            id,
            name: format!("Artist {}", id),
            profile_picture_url: format!("https://example.com/{}.jpg", id),
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_load_then_play_selected_collection() {
    let source = FixtureSource {
        collections: vec![
            StoryCollection::new("Streets", stories(&[1, 2])),
            StoryCollection::new("Portraits", stories(&[3])),
        ],
    };
    let list = Session::spawn(StoryListFeature::new(Arc::new(source)));

    list.send(StoryListAction::LoadStoryCollections).unwrap();
    let state = list
        .wait_for(|s| !matches!(s.collections, RequestState::Idle))
        .await
        .unwrap();
    assert!(state.collections.is_loading());

    let state = list
        .wait_for(|s| s.collections.value().is_some())
        .await
        .unwrap();
    let collections = state.collections.value().unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(state.items.len(), 2);

    let portraits = collections[1].id;
    list.send(StoryListAction::SelectCollection(Some(portraits)))
        .unwrap();
    let state = list.wait_for(|s| s.selected.is_some()).await.unwrap();
    assert_eq!(
        state.selected_collection().map(|c| c.display_name.as_str()),
        Some("Portraits")
    );

    // A single-segment collection finishes after one segment
    let player = Session::spawn(state.open(portraits).unwrap());
    player.send(StoryAction::Begin { index: 0 }).unwrap();
    let playback = player
        .wait_for(|s| s.ui_command().is_some())
        .await
        .unwrap();
    assert_eq!(playback.ui_command(), Some(UiCommand::Finish));
    assert_eq!(playback.current_item().map(|item| item.id), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_reports_user_message() {
    let list = Session::spawn(StoryListFeature::new(Arc::new(OfflineSource)));
    list.send(StoryListAction::LoadStoryCollections).unwrap();

    let state = list
        .wait_for(|s| matches!(s.collections, RequestState::Failure(_)))
        .await
        .unwrap();
    assert_eq!(
        state.error_message.as_deref(),
        Some("Cannot connect to the internet. Please check your connection.")
    );
    assert!(state.items.is_empty());

    list.send(StoryListAction::ClearError).unwrap();
    let state = list.wait_for(|s| s.error_message.is_none()).await.unwrap();
    assert!(matches!(state.collections, RequestState::Failure(_)));
}
