//! Segment timer scheduling
//!
//! The coordinator only sleeps and delivers. It never cancels and never looks
//! at generations: a timer that became stale while sleeping is still
//! delivered, and the reducer drops it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;

pub struct TimerCoordinator<A> {
    sink: WeakUnboundedSender<A>,
    in_flight: Arc<AtomicUsize>,
}

impl<A> Clone for TimerCoordinator<A> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<A: Send + 'static> TimerCoordinator<A> {
    /// The sink is weak so pending timers never keep a session alive
    pub fn new(sink: WeakUnboundedSender<A>) -> Self {
        Self {
            sink,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delivers `fire` to the sink after `delay`
    pub fn schedule(&self, delay: Duration, fire: A) {
        let sink = self.sink.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            match sink.upgrade() {
                Some(sender) => {
                    if sender.send(fire).is_err() {
                        log::trace!("Timer fired after its session closed");
                    }
                }
                None => log::trace!("Timer fired after its session closed"),
            }
        });
    }

    /// Timers scheduled but not yet delivered, stale ones included
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
