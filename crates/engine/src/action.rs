//! Actions accepted by the story playback machine and the commands it emits

use std::fmt;
use std::time::Duration;

/// One-shot instruction for the presentation layer
///
/// Lives in a single slot on the state until acknowledged with
/// [`StoryAction::UiCommandHandled`]; a newer command overwrites an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Bring the page at `index` on screen
    ScrollTo { index: usize, animated: bool },
    /// Playback ran past the last segment; dismiss the viewer
    Finish,
}

impl fmt::Display for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScrollTo { index, animated } => {
                write!(f, "scroll to {} (animated: {})", index, animated)
            }
            Self::Finish => write!(f, "finish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryAction {
    /// Viewer became active on `index`
    Begin { index: usize },
    Pause,
    Resume,
    /// Restart the current segment from zero
    ResetAndPlay,
    /// Move to another segment (tap, swipe, programmatic)
    Jump { new_index: usize },
    /// Schedule the segment timer
    StartTimer { delay: Duration },
    StopTimer,
    /// Segment timer completion, stamped with the generation it was scheduled for
    TimerFired { generation: u64 },
    /// Sent by the presentation layer once a scroll has settled
    StartNextTimer,
    /// Acknowledges the pending [`UiCommand`]
    UiCommandHandled,
}
