//! Story engine - playback state machine and session runtime for StoryReel

mod action;
mod clock;
mod error;
mod feature;
pub mod interaction;
pub mod presenter;
mod session;
mod state;
mod store;
mod story;
mod story_list;
mod timer;

pub use action::{StoryAction, UiCommand};
pub use clock::SegmentClock;
pub use error::{EngineError, EngineResult};
pub use feature::{Effect, Feature};
pub use interaction::{Activity, GestureClassifier, GestureEvent};
pub use presenter::{
    CommandObserver, PagerDriver, PagerHost, PagerSignals, ScrollPhase, StorySession,
    DEFAULT_SCROLL_ANIMATION,
};
pub use session::{Session, SessionHandle};
pub use state::{PlaybackState, DEFAULT_SEGMENT_DURATION};
pub use store::Store;
pub use story::{StoryFeature, DEFAULT_RESUME_SKIP_THRESHOLD};
pub use story_list::{RequestState, StoryListAction, StoryListFeature, StoryListState};
pub use timer::TimerCoordinator;
