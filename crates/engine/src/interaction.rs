//! Touch classification for the story page
//!
//! Raw touch samples go in, discrete [`GestureEvent`]s come out. The
//! classifier holds no timers of its own; the host calls [`GestureClassifier::tick`]
//! (or any other sample) with the current instant and pending long presses
//! are resolved then.

use std::time::Duration;
use tokio::time::Instant;

/// Movement needed before a press becomes a drag, in points
pub const DRAG_THRESHOLD: f64 = 30.0;

/// Hold time before a press becomes a long press
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(100);

/// Vertical drag offset, past the drag threshold, that dismisses the viewer
pub const DISMISS_THRESHOLD: f64 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Up,
    Touching,
    LongPressing,
    Dragging { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    TouchDown,
    Tap,
    LongPress,
    Dragging { dx: f64, dy: f64 },
    /// Finger lifted; `dismiss` is set when the drag went far enough down
    TouchUp { dismiss: bool },
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    activity: Activity,
    pressed_at: Option<Instant>,
    tap_eligible: bool,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            activity: Activity::Up,
            pressed_at: None,
            tap_eligible: false,
        }
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Vertical offset the page should be drawn at while dragging
    pub fn drag_offset(&self) -> f64 {
        match self.activity {
            Activity::Dragging { dy, .. } => (dy - DRAG_THRESHOLD).max(0.0),
            _ => 0.0,
        }
    }

    pub fn touch_down(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.pressed_at = Some(now);
        self.tap_eligible = true;
        self.transition(Activity::Touching, &mut events);
        events
    }

    /// Resolves a pending long press
    pub fn tick(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.resolve_long_press(now, &mut events);
        events
    }

    /// Finger moved by `(dx, dy)` from where it went down
    pub fn moved(&mut self, dx: f64, dy: f64, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.resolve_long_press(now, &mut events);

        if dx.hypot(dy) < DRAG_THRESHOLD {
            return events;
        }

        match self.activity {
            Activity::LongPressing | Activity::Dragging { .. } => {
                self.transition(Activity::Dragging { dx, dy }, &mut events);
            }
            Activity::Touching => {
                // Moved too far for a press; the touch is abandoned
                self.tap_eligible = false;
                self.pressed_at = None;
                self.transition(Activity::Up, &mut events);
            }
            Activity::Up => {}
        }
        events
    }

    pub fn touch_up(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.resolve_long_press(now, &mut events);

        if self.tap_eligible && self.activity == Activity::Touching {
            events.push(GestureEvent::Tap);
        }
        self.tap_eligible = false;
        self.pressed_at = None;
        self.transition(Activity::Up, &mut events);
        events
    }

    fn resolve_long_press(&mut self, now: Instant, events: &mut Vec<GestureEvent>) {
        if self.activity != Activity::Touching {
            return;
        }
        if let Some(pressed_at) = self.pressed_at {
            if now.saturating_duration_since(pressed_at) >= LONG_PRESS_THRESHOLD {
                self.tap_eligible = false;
                self.transition(Activity::LongPressing, events);
            }
        }
    }

    fn transition(&mut self, next: Activity, events: &mut Vec<GestureEvent>) {
        if next == self.activity {
            return;
        }
        let dismiss = self.drag_offset() > DISMISS_THRESHOLD;
        self.activity = next;

        events.push(match next {
            Activity::Touching => GestureEvent::TouchDown,
            Activity::LongPressing => GestureEvent::LongPress,
            Activity::Dragging { dx, dy } => GestureEvent::Dragging { dx, dy },
            Activity::Up => GestureEvent::TouchUp { dismiss },
        });
    }
}
