//! Segment clock: elapsed, progress and remaining time of one segment
//!
//! The clock only records instants; every query takes `now` explicitly so the
//! results are deterministic and the reducer stays free of hidden time reads.
//! Instants are `tokio::time::Instant` so paused-time tests drive them.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentClock {
    started_at: Option<Instant>,
    paused_accumulated: Duration,
    pause_began_at: Option<Instant>,
}

impl SegmentClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Pause time already folded into the current segment
    pub fn paused_accumulated(&self) -> Duration {
        self.paused_accumulated
    }

    pub fn pause_began_at(&self) -> Option<Instant> {
        self.pause_began_at
    }

    pub fn is_paused(&self) -> bool {
        self.pause_began_at.is_some()
    }

    /// Starts the segment over at `now`, dropping any pause bookkeeping
    pub fn restart(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.paused_accumulated = Duration::ZERO;
        self.pause_began_at = None;
    }

    /// Marks the start of a pause. Returns false if already paused.
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.is_paused() {
            return false;
        }
        self.pause_began_at = Some(now);
        true
    }

    /// Folds the active pause into the accumulated pause time.
    /// Returns false if the clock was not paused.
    pub fn resume(&mut self, now: Instant) -> bool {
        match self.pause_began_at.take() {
            Some(began) => {
                self.paused_accumulated += now.saturating_duration_since(began);
                true
            }
            None => false,
        }
    }

    fn active_pause(&self, now: Instant) -> Duration {
        self.pause_began_at
            .map(|began| now.saturating_duration_since(began))
            .unwrap_or(Duration::ZERO)
    }

    /// Playing time of the segment, never negative
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => now
                .saturating_duration_since(start)
                .saturating_sub(self.paused_accumulated)
                .saturating_sub(self.active_pause(now)),
            None => Duration::ZERO,
        }
    }

    /// Fraction of the segment played, in `[0, 1]`
    pub fn progress(&self, now: Instant, segment: Duration) -> f64 {
        if self.started_at.is_none() {
            return 0.0;
        }
        if segment.is_zero() {
            return 1.0;
        }
        (self.elapsed(now).as_secs_f64() / segment.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Time left in the segment; the full segment if the clock never started
    pub fn remaining(&self, now: Instant, segment: Duration) -> Duration {
        if self.started_at.is_none() {
            return segment;
        }
        segment.saturating_sub(self.elapsed(now))
    }
}
