//! Presentation-side adapter for the story pager
//!
//! [`PagerSignals`] turns host events (scrolling, drags, taps, transitions)
//! into [`StoryAction`]s. [`PagerDriver`] watches the session for
//! [`UiCommand`]s, performs them through a [`PagerHost`] and acknowledges
//! them.

use crate::action::{StoryAction, UiCommand};
use crate::error::{EngineError, EngineResult};
use crate::interaction::GestureEvent;
use crate::session::SessionHandle;
use crate::state::PlaybackState;
use crate::story::StoryFeature;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storyreel_core::Haptics;
use tokio::sync::watch;

/// How long an animated scroll takes before the next segment is timed
pub const DEFAULT_SCROLL_ANIMATION: Duration = Duration::from_millis(300);

pub type StorySession = SessionHandle<StoryFeature>;

/// What the pager can be asked to do on screen
pub trait PagerHost: Send + Sync {
    fn scroll_to(&self, index: usize, animated: bool);
    fn dismiss(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Interacting,
    Decelerating,
    Animating,
}

impl ScrollPhase {
    pub fn is_scrolling(self) -> bool {
        self != Self::Idle
    }
}

/// Hands out each UI command once
///
/// Remembers the last slot value it saw and yields a command only when the
/// slot changes to a command.
#[derive(Debug, Clone, Default)]
pub struct CommandObserver {
    last: Option<UiCommand>,
}

impl CommandObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, current: Option<UiCommand>) -> Option<UiCommand> {
        if current == self.last {
            return None;
        }
        self.last = current;
        current
    }
}

/// Cloneable sender of host events
#[derive(Clone)]
pub struct PagerSignals {
    session: StorySession,
    haptics: Arc<dyn Haptics>,
    dragging: Arc<AtomicBool>,
}

impl PagerSignals {
    pub fn new(session: StorySession, haptics: Arc<dyn Haptics>) -> Self {
        Self {
            session,
            haptics,
            dragging: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> &StorySession {
        &self.session
    }

    /// A view transition started (`true`) or settled (`false`)
    pub fn transition(&self, transitioning: bool) -> EngineResult<()> {
        if transitioning {
            self.session.send(StoryAction::Pause)
        } else {
            let index = self.session.state().index();
            self.session.send(StoryAction::Begin { index })
        }
    }

    pub fn scroll_phase(&self, phase: ScrollPhase) -> EngineResult<()> {
        if phase.is_scrolling() {
            self.session.send(StoryAction::Pause)
        } else {
            self.session.send(StoryAction::Resume)
        }
    }

    /// Only changes of the drag flag are forwarded
    pub fn dragging(&self, dragging: bool) -> EngineResult<()> {
        if self.dragging.swap(dragging, Ordering::SeqCst) == dragging {
            return Ok(());
        }
        if dragging {
            self.session.send(StoryAction::Pause)
        } else {
            self.session.send(StoryAction::Resume)
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }

    pub fn tap(&self) -> EngineResult<()> {
        let index = self.session.state().index();
        self.session.send(StoryAction::Jump {
            new_index: index + 1,
        })
    }

    /// The user settled the pager on `page`
    pub fn page_changed(&self, page: usize) -> EngineResult<()> {
        self.session.send(StoryAction::Jump { new_index: page })?;
        self.haptics.trigger();
        Ok(())
    }

    /// Forwards a classified gesture. Returns true when it asks for dismissal.
    pub fn gesture(&self, event: GestureEvent) -> EngineResult<bool> {
        match event {
            GestureEvent::TouchDown => Ok(false),
            GestureEvent::Tap => self.tap().map(|_| false),
            GestureEvent::LongPress | GestureEvent::Dragging { .. } => {
                self.dragging(true).map(|_| false)
            }
            GestureEvent::TouchUp { dismiss } => self.dragging(false).map(|_| dismiss),
        }
    }
}

pub struct PagerDriver<H: PagerHost> {
    signals: PagerSignals,
    host: Arc<H>,
    updates: watch::Receiver<PlaybackState>,
    observer: CommandObserver,
    scroll_animation: Duration,
}

impl<H: PagerHost + 'static> PagerDriver<H> {
    pub fn new(session: StorySession, host: Arc<H>, haptics: Arc<dyn Haptics>) -> Self {
        let updates = session.subscribe();
        Self {
            signals: PagerSignals::new(session, haptics),
            host,
            updates,
            observer: CommandObserver::new(),
            scroll_animation: DEFAULT_SCROLL_ANIMATION,
        }
    }

    pub fn with_scroll_animation(mut self, duration: Duration) -> Self {
        self.scroll_animation = duration;
        self
    }

    pub fn signals(&self) -> PagerSignals {
        self.signals.clone()
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Forwards a gesture and dismisses through the host when asked to
    pub fn gesture(&self, event: GestureEvent) -> EngineResult<()> {
        if self.signals.gesture(event)? {
            self.host.dismiss();
        }
        Ok(())
    }

    /// Waits for the next command not yet handed out.
    /// Returns `None` once the session has closed.
    pub async fn next_command(&mut self) -> Option<UiCommand> {
        loop {
            let current = self.updates.borrow_and_update().ui_command();
            if let Some(command) = self.observer.observe(current) {
                return Some(command);
            }
            if self.updates.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Performs `command` on the host and acknowledges it
    pub async fn handle_command(&mut self, command: UiCommand) -> EngineResult<()> {
        log::debug!("Handling {}", command);
        let session = self.signals.session();

        match command {
            UiCommand::ScrollTo { index, animated } => {
                self.host.scroll_to(index, animated);
                if animated {
                    let session = session.clone();
                    let delay = self.scroll_animation;
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = session.send(StoryAction::StartNextTimer);
                    });
                } else {
                    session.send(StoryAction::StartNextTimer)?;
                }
            }
            UiCommand::Finish => self.host.dismiss(),
        }

        session.send(StoryAction::UiCommandHandled)?;
        self.updates
            .wait_for(|state| state.ui_command() != Some(command))
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        Ok(())
    }

    /// Handles commands until playback finishes or the session closes
    pub async fn run(&mut self) -> EngineResult<()> {
        while let Some(command) = self.next_command().await {
            self.handle_command(command).await?;
            if command == UiCommand::Finish {
                log::info!("Story playback finished");
                return Ok(());
            }
        }
        Ok(())
    }
}
