//! Story playback: the reducer and effect dispatcher of one story pager
//!
//! Transitions are synchronous. The only asynchronous piece is the segment
//! timer, which is described as [`Effect::Timer`] carrying the generation it
//! was scheduled for. Anything that must cancel an in-flight timer bumps the
//! generation; when the stale timer eventually fires, `TimerFired` finds a
//! mismatch and does nothing.

use crate::action::{StoryAction, UiCommand};
use crate::feature::{Effect, Feature};
use crate::state::{PlaybackState, DEFAULT_SEGMENT_DURATION};
use std::sync::Arc;
use std::time::Duration;
use storyreel_core::{StoryCollection, StoryItem};
use tokio::time::Instant;

/// Below this much remaining time a resume restarts the segment instead of
/// scheduling an almost-immediate fire.
pub const DEFAULT_RESUME_SKIP_THRESHOLD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct StoryFeature {
    items: Arc<[StoryItem]>,
    segment_duration: Duration,
    resume_skip_threshold: Duration,
}

impl StoryFeature {
    pub fn new(collection: &StoryCollection) -> Self {
        Self::from_items(StoryItem::from_collection(collection))
    }

    pub fn from_items(items: Vec<StoryItem>) -> Self {
        Self {
            items: items.into(),
            segment_duration: DEFAULT_SEGMENT_DURATION,
            resume_skip_threshold: DEFAULT_RESUME_SKIP_THRESHOLD,
        }
    }

    pub fn with_segment_duration(mut self, duration: Duration) -> Self {
        self.segment_duration = duration;
        self
    }

    pub fn with_resume_skip_threshold(mut self, threshold: Duration) -> Self {
        self.resume_skip_threshold = threshold;
        self
    }

    pub fn items(&self) -> &[StoryItem] {
        &self.items
    }

    pub fn segment_duration(&self) -> Duration {
        self.segment_duration
    }
}

impl Feature for StoryFeature {
    type State = PlaybackState;
    type Action = StoryAction;

    fn initial_state(&self) -> PlaybackState {
        PlaybackState::new(Arc::clone(&self.items), self.segment_duration)
    }

    fn reduce(&self, state: &mut PlaybackState, action: &StoryAction, now: Instant) {
        match *action {
            StoryAction::Begin { index } => {
                state.index = state.clamp_index(index);
                state.invalidate_timer_completion();
            }
            StoryAction::Pause => {
                if state.clock.pause(now) {
                    state.invalidate_timer_completion();
                }
            }
            StoryAction::Resume => {
                state.clock.resume(now);
            }
            StoryAction::ResetAndPlay => {
                state.reset_timer(now);
                state.invalidate_timer_completion();
            }
            StoryAction::Jump { new_index } => {
                let clamped = state.clamp_index(new_index);
                if clamped == state.index {
                    return;
                }
                state.index = clamped;
                state.reset_timer(now);
                state.invalidate_timer_completion();
                state.ui_command = Some(UiCommand::ScrollTo {
                    index: clamped,
                    animated: false,
                });
            }
            StoryAction::TimerFired { generation } => {
                if generation != state.timer_generation {
                    log::debug!(
                        "Dropping stale timer (generation {}, current {})",
                        generation,
                        state.timer_generation
                    );
                    return;
                }
                state.reset_timer(now);

                if state.is_last() {
                    log::debug!("Last segment finished");
                    state.ui_command = Some(UiCommand::Finish);
                } else {
                    state.index += 1;
                    state.ui_command = Some(UiCommand::ScrollTo {
                        index: state.index,
                        animated: true,
                    });
                }
            }
            StoryAction::StartTimer { .. } | StoryAction::StopTimer => {
                state.invalidate_timer_completion();
            }
            StoryAction::StartNextTimer => {}
            StoryAction::UiCommandHandled => {
                state.ui_command = None;
            }
        }
    }

    fn effect(
        &self,
        action: &StoryAction,
        state: &PlaybackState,
        now: Instant,
    ) -> Effect<StoryAction> {
        match *action {
            StoryAction::Begin { .. } => Effect::Send(StoryAction::ResetAndPlay),
            StoryAction::Pause => Effect::Send(StoryAction::StopTimer),
            StoryAction::Resume => {
                let remaining = state.remaining(now);
                if remaining < self.resume_skip_threshold {
                    Effect::Send(StoryAction::ResetAndPlay)
                } else {
                    Effect::Send(StoryAction::StartTimer { delay: remaining })
                }
            }
            StoryAction::ResetAndPlay | StoryAction::Jump { .. } => {
                Effect::Send(StoryAction::StartTimer {
                    delay: state.segment_duration,
                })
            }
            StoryAction::StartTimer { delay } => {
                if delay.is_zero() {
                    return Effect::None;
                }
                Effect::Timer {
                    delay,
                    fire: StoryAction::TimerFired {
                        generation: state.timer_generation,
                    },
                }
            }
            // The current segment has been presented but not yet timed, so a
            // segment remains whenever the pager has any items at all.
            StoryAction::StartNextTimer => {
                if state.items.is_empty() {
                    Effect::Send(StoryAction::StopTimer)
                } else {
                    Effect::Send(StoryAction::StartTimer {
                        delay: state.segment_duration,
                    })
                }
            }
            StoryAction::TimerFired { .. }
            | StoryAction::StopTimer
            | StoryAction::UiCommandHandled => Effect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_core::Story;

    const SEGMENT: Duration = Duration::from_secs(3);

    fn feature(count: u32) -> StoryFeature {
        let items = (1..=count)
            .map(|id| {
                StoryItem::new(Story {
                    id,
                    name: format!("Artist {}", id),
                    profile_picture_url: format!("https://example.com/{}.jpg", id),
                })
            })
            .collect();
        StoryFeature::from_items(items)
    }

    fn apply(
        feature: &StoryFeature,
        state: &mut PlaybackState,
        action: StoryAction,
        now: Instant,
    ) -> Effect<StoryAction> {
        feature.reduce(state, &action, now);
        feature.effect(&action, state, now)
    }

    #[test]
    fn test_begin_clamps_and_invalidates() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let effect = apply(&feature, &mut state, StoryAction::Begin { index: 7 }, Instant::now());

        assert_eq!(state.index(), 2);
        assert_eq!(state.timer_generation(), 1);
        assert_eq!(effect, Effect::Send(StoryAction::ResetAndPlay));
    }

    #[test]
    fn test_begin_on_empty_collection() {
        let feature = feature(0);
        let mut state = feature.initial_state();
        apply(&feature, &mut state, StoryAction::Begin { index: 3 }, Instant::now());
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_jump_on_empty_collection_is_a_no_op() {
        let feature = feature(0);
        let mut state = feature.initial_state();
        let before = state.clone();

        let effect = apply(&feature, &mut state, StoryAction::Jump { new_index: 5 }, Instant::now());

        assert_eq!(state, before);
        assert!(state.ui_command().is_none());
        assert_eq!(effect, Effect::Send(StoryAction::StartTimer { delay: SEGMENT }));
    }

    #[test]
    fn test_timer_fired_on_empty_collection_finishes() {
        let feature = feature(0);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::Begin { index: 0 }, t0);
        let generation = state.timer_generation();

        let effect = apply(
            &feature,
            &mut state,
            StoryAction::TimerFired { generation },
            t0 + SEGMENT,
        );

        assert_eq!(state.index(), 0);
        assert_eq!(state.ui_command(), Some(UiCommand::Finish));
        assert!(effect.is_none());
    }

    #[test]
    fn test_reset_and_play_starts_full_timer() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        let effect = apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);

        assert_eq!(state.started_at(), Some(t0));
        assert_eq!(effect, Effect::Send(StoryAction::StartTimer { delay: SEGMENT }));
    }

    #[test]
    fn test_start_timer_captures_new_generation() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let effect = apply(
            &feature,
            &mut state,
            StoryAction::StartTimer { delay: SEGMENT },
            Instant::now(),
        );

        assert_eq!(state.timer_generation(), 1);
        assert_eq!(
            effect,
            Effect::Timer {
                delay: SEGMENT,
                fire: StoryAction::TimerFired { generation: 1 }
            }
        );
    }

    #[test]
    fn test_start_timer_with_zero_delay_schedules_nothing() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let effect = apply(
            &feature,
            &mut state,
            StoryAction::StartTimer {
                delay: Duration::ZERO,
            },
            Instant::now(),
        );
        assert!(effect.is_none());
        assert_eq!(state.timer_generation(), 1);
    }

    #[test]
    fn test_pause_twice_only_counts_once() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);

        let effect = apply(&feature, &mut state, StoryAction::Pause, t0);
        assert_eq!(effect, Effect::Send(StoryAction::StopTimer));
        assert!(state.is_paused());
        let generation = state.timer_generation();

        apply(&feature, &mut state, StoryAction::Pause, t0 + SEGMENT);
        assert_eq!(state.pause_began_at(), Some(t0));
        assert_eq!(state.timer_generation(), generation);
    }

    #[test]
    fn test_resume_keeps_generation_and_schedules_remaining() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        apply(&feature, &mut state, StoryAction::Pause, t0 + Duration::from_secs(1));
        let generation = state.timer_generation();

        let effect = apply(&feature, &mut state, StoryAction::Resume, t0 + Duration::from_secs(9));

        assert!(!state.is_paused());
        assert_eq!(state.timer_generation(), generation);
        assert_eq!(state.paused_accumulated(), Duration::from_secs(8));
        assert_eq!(
            effect,
            Effect::Send(StoryAction::StartTimer {
                delay: Duration::from_secs(2)
            })
        );
    }

    #[test]
    fn test_pause_resume_preserves_remaining() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);

        let paused_at = t0 + Duration::from_millis(1200);
        let before = state.remaining(paused_at);
        apply(&feature, &mut state, StoryAction::Pause, paused_at);

        let resumed_at = paused_at + Duration::from_secs(42);
        apply(&feature, &mut state, StoryAction::Resume, resumed_at);
        assert_eq!(state.remaining(resumed_at), before);
    }

    #[test]
    fn test_resume_near_end_restarts_segment() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        apply(&feature, &mut state, StoryAction::Pause, t0 + Duration::from_millis(2950));

        let effect = apply(&feature, &mut state, StoryAction::Resume, t0 + Duration::from_secs(5));
        assert_eq!(effect, Effect::Send(StoryAction::ResetAndPlay));
    }

    #[test]
    fn test_resume_threshold_is_tunable() {
        let feature = feature(3).with_resume_skip_threshold(Duration::from_secs(1));
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        apply(&feature, &mut state, StoryAction::Pause, t0 + Duration::from_millis(2500));

        let effect = apply(&feature, &mut state, StoryAction::Resume, t0 + Duration::from_secs(4));
        assert_eq!(effect, Effect::Send(StoryAction::ResetAndPlay));
    }

    #[test]
    fn test_jump_moves_and_emits_unanimated_scroll() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        let generation = state.timer_generation();

        let t1 = t0 + Duration::from_secs(1);
        let effect = apply(&feature, &mut state, StoryAction::Jump { new_index: 2 }, t1);

        assert_eq!(state.index(), 2);
        assert_eq!(state.started_at(), Some(t1));
        assert!(state.timer_generation() > generation);
        assert_eq!(
            state.ui_command(),
            Some(UiCommand::ScrollTo {
                index: 2,
                animated: false
            })
        );
        assert_eq!(effect, Effect::Send(StoryAction::StartTimer { delay: SEGMENT }));
    }

    #[test]
    fn test_jump_to_current_index_leaves_state_untouched() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::Begin { index: 1 }, t0);
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        let before = state.clone();

        let effect = apply(
            &feature,
            &mut state,
            StoryAction::Jump { new_index: 1 },
            t0 + Duration::from_secs(1),
        );

        assert_eq!(state, before);
        assert!(state.ui_command().is_none());
        // The timer is still (re)started; only the state is untouched.
        assert_eq!(effect, Effect::Send(StoryAction::StartTimer { delay: SEGMENT }));
    }

    #[test]
    fn test_jump_past_end_clamps_to_last() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        apply(&feature, &mut state, StoryAction::Jump { new_index: 50 }, Instant::now());
        assert_eq!(state.index(), 2);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        apply(&feature, &mut state, StoryAction::StartTimer { delay: SEGMENT }, t0);
        let stale = state.timer_generation() - 1;
        let before = state.clone();

        let effect = apply(
            &feature,
            &mut state,
            StoryAction::TimerFired { generation: stale },
            t0 + SEGMENT,
        );

        assert_eq!(state, before);
        assert!(effect.is_none());
    }

    #[test]
    fn test_timer_fired_advances_with_animation() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();
        apply(&feature, &mut state, StoryAction::ResetAndPlay, t0);
        let generation = state.timer_generation();

        let effect = apply(
            &feature,
            &mut state,
            StoryAction::TimerFired { generation },
            t0 + SEGMENT,
        );

        assert_eq!(state.index(), 1);
        assert_eq!(state.started_at(), Some(t0 + SEGMENT));
        assert_eq!(state.timer_generation(), generation);
        assert_eq!(
            state.ui_command(),
            Some(UiCommand::ScrollTo {
                index: 1,
                animated: true
            })
        );
        assert!(effect.is_none());
    }

    #[test]
    fn test_repeated_fires_walk_to_finish() {
        let count = 5;
        let feature = feature(count);
        let mut state = feature.initial_state();
        let mut now = Instant::now();

        for fired in 1..=count as usize {
            now += SEGMENT;
            let generation = state.timer_generation();
            apply(&feature, &mut state, StoryAction::TimerFired { generation }, now);

            if fired < count as usize {
                assert_eq!(state.index(), fired);
            } else {
                assert_eq!(state.index(), count as usize - 1);
                assert_eq!(state.ui_command(), Some(UiCommand::Finish));
            }
        }
    }

    #[test]
    fn test_ui_command_is_single_slot() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let now = Instant::now();
        apply(&feature, &mut state, StoryAction::Jump { new_index: 1 }, now);
        apply(&feature, &mut state, StoryAction::Jump { new_index: 2 }, now);

        assert_eq!(
            state.ui_command(),
            Some(UiCommand::ScrollTo {
                index: 2,
                animated: false
            })
        );

        apply(&feature, &mut state, StoryAction::UiCommandHandled, now);
        assert!(state.ui_command().is_none());
    }

    #[test]
    fn test_start_next_timer() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let now = Instant::now();
        let before = state.clone();

        let effect = apply(&feature, &mut state, StoryAction::StartNextTimer, now);
        assert_eq!(state, before);
        assert_eq!(effect, Effect::Send(StoryAction::StartTimer { delay: SEGMENT }));

        let empty = super::tests::feature(0);
        let mut empty_state = empty.initial_state();
        let effect = apply(&empty, &mut empty_state, StoryAction::StartNextTimer, now);
        assert_eq!(effect, Effect::Send(StoryAction::StopTimer));
    }

    #[test]
    fn test_generation_increases_on_invalidating_actions() {
        let feature = feature(3);
        let mut state = feature.initial_state();
        let t0 = Instant::now();

        let actions = [
            StoryAction::Begin { index: 0 },
            StoryAction::ResetAndPlay,
            StoryAction::StartTimer { delay: SEGMENT },
            StoryAction::Pause,
            StoryAction::StopTimer,
            StoryAction::Jump { new_index: 2 },
        ];

        for action in actions {
            let before = state.timer_generation();
            apply(&feature, &mut state, action, t0);
            assert!(
                state.timer_generation() > before,
                "{:?} did not invalidate",
                action
            );
        }
    }

    #[test]
    fn test_custom_segment_duration() {
        let feature = feature(2).with_segment_duration(Duration::from_secs(5));
        let mut state = feature.initial_state();
        assert_eq!(state.segment_duration(), Duration::from_secs(5));

        let effect = apply(&feature, &mut state, StoryAction::ResetAndPlay, Instant::now());
        assert_eq!(
            effect,
            Effect::Send(StoryAction::StartTimer {
                delay: Duration::from_secs(5)
            })
        );
    }
}
