//! Story playback timing

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// How long each story stays on screen (milliseconds)
    pub segment_duration_ms: u64,

    /// Resuming with less than this left restarts the story (milliseconds)
    pub resume_skip_threshold_ms: u64,

    /// Length of the animated scroll between stories (milliseconds)
    pub scroll_animation_ms: u64,

    /// Redraw interval of the progress bars (milliseconds)
    pub tick_ms: u64,
}

impl PlaybackConfig {
    pub fn segment_duration(&self) -> Duration {
        Duration::from_millis(self.segment_duration_ms)
    }

    pub fn resume_skip_threshold(&self) -> Duration {
        Duration::from_millis(self.resume_skip_threshold_ms)
    }

    pub fn scroll_animation(&self) -> Duration {
        Duration::from_millis(self.scroll_animation_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: 3000,
            resume_skip_threshold_ms: 100,
            scroll_animation_ms: 300,
            tick_ms: 66,
        }
    }
}

impl ConfigSection for PlaybackConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(
                self.segment_duration_ms,
                500,
                60_000,
                "playback.segment_duration_ms",
            ),
            Validator::in_range(
                self.resume_skip_threshold_ms,
                0,
                1000,
                "playback.resume_skip_threshold_ms",
            ),
            Validator::in_range(
                self.scroll_animation_ms,
                0,
                2000,
                "playback.scroll_animation_ms",
            ),
            Validator::in_range(self.tick_ms, 16, 1000, "playback.tick_ms"),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.segment_duration_ms = other.segment_duration_ms;
        self.resume_skip_threshold_ms = other.resume_skip_threshold_ms;
        self.scroll_animation_ms = other.scroll_animation_ms;
        self.tick_ms = other.tick_ms;
    }

    fn section_name(&self) -> &'static str {
        "playback"
    }
}
