//! Playback state of one opened story collection

use crate::action::UiCommand;
use crate::clock::SegmentClock;
use std::sync::Arc;
use std::time::Duration;
use storyreel_core::StoryItem;
use tokio::time::Instant;

/// How long each segment stays on screen unless configured otherwise
pub const DEFAULT_SEGMENT_DURATION: Duration = Duration::from_secs(3);

/// State of the story pager
///
/// Created when a collection is opened and dropped when the viewer is
/// dismissed. `index` is always a valid position in `items` (0 when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub(crate) items: Arc<[StoryItem]>,
    pub(crate) segment_duration: Duration,
    pub(crate) index: usize,
    pub(crate) clock: SegmentClock,
    pub(crate) timer_generation: u64,
    pub(crate) ui_command: Option<UiCommand>,
}

impl PlaybackState {
    pub fn new(items: impl Into<Arc<[StoryItem]>>, segment_duration: Duration) -> Self {
        Self {
            items: items.into(),
            segment_duration,
            index: 0,
            clock: SegmentClock::new(),
            timer_generation: 0,
            ui_command: None,
        }
    }

    pub fn items(&self) -> &[StoryItem] {
        &self.items
    }

    pub fn segment_duration(&self) -> Duration {
        self.segment_duration
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_item(&self) -> Option<&StoryItem> {
        self.items.get(self.index)
    }

    pub fn clock(&self) -> &SegmentClock {
        &self.clock
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.clock.started_at()
    }

    pub fn paused_accumulated(&self) -> Duration {
        self.clock.paused_accumulated()
    }

    pub fn pause_began_at(&self) -> Option<Instant> {
        self.clock.pause_began_at()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    pub fn ui_command(&self) -> Option<UiCommand> {
        self.ui_command
    }

    /// True when the current segment is the last one (or there are none)
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.items.len()
    }

    pub fn progress(&self, now: Instant) -> f64 {
        self.clock.progress(now, self.segment_duration)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.clock.remaining(now, self.segment_duration)
    }

    /// Fill fraction of every progress bar: full before the current segment,
    /// the current progress on it, empty after it.
    pub fn segment_fills(&self, now: Instant) -> Vec<f64> {
        let progress = self.progress(now);
        (0..self.items.len())
            .map(|i| match i.cmp(&self.index) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Equal => progress,
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    /// Clamps an index into `[0, items.len() - 1]`, or 0 for an empty list
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.items.len().saturating_sub(1))
    }

    pub(crate) fn reset_timer(&mut self, now: Instant) {
        self.clock.restart(now);
    }

    /// Makes every timer scheduled so far stale
    pub(crate) fn invalidate_timer_completion(&mut self) {
        self.timer_generation = self.timer_generation.wrapping_add(1);
    }
}
