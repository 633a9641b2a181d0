//! Session runtime: one tokio task per opened feature
//!
//! Actions are reduced strictly in submission order. After each transition
//! the new state is published on a `watch` channel and only then is the
//! effect executed, so a follow-up never observes an intermediate state.
//! The session ends when the last [`SessionHandle`] is dropped; queued
//! follow-ups and pending timers die with it.

use crate::error::{EngineError, EngineResult};
use crate::feature::{Effect, Feature};
use crate::timer::TimerCoordinator;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::watch;
use tokio::time::Instant;

pub struct Session;

impl Session {
    /// Spawns the session actor on the current tokio runtime
    pub fn spawn<F: Feature>(feature: F) -> SessionHandle<F> {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(feature.initial_state());
        let timers = TimerCoordinator::new(inbox_tx.downgrade());

        let actor = SessionActor {
            feature: Arc::new(feature),
            inbox: inbox_rx,
            loopback: inbox_tx.downgrade(),
            timers: timers.clone(),
            state: state_tx,
        };
        tokio::spawn(actor.run());

        SessionHandle {
            inbox: inbox_tx,
            state: state_rx,
            timers,
        }
    }
}

/// Cloneable handle to a running session
pub struct SessionHandle<F: Feature> {
    inbox: UnboundedSender<F::Action>,
    state: watch::Receiver<F::State>,
    timers: TimerCoordinator<F::Action>,
}

impl<F: Feature> Clone for SessionHandle<F> {
    fn clone(&self) -> Self {
        Self {
            inbox: self.inbox.clone(),
            state: self.state.clone(),
            timers: self.timers.clone(),
        }
    }
}

impl<F: Feature> SessionHandle<F> {
    /// Queues an action behind everything already submitted
    pub fn send(&self, action: F::Action) -> EngineResult<()> {
        self.inbox
            .send(action)
            .map_err(|_| EngineError::SessionClosed)
    }

    /// Snapshot of the latest published state
    pub fn state(&self) -> F::State {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<F::State> {
        self.state.clone()
    }

    /// Waits until the published state satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&F::State) -> bool,
    ) -> EngineResult<F::State> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|state| predicate(state))
            .await
            .map_err(|_| EngineError::SessionClosed)?;
        Ok(state.clone())
    }

    /// Timers still sleeping, including ones that will turn out stale
    pub fn pending_timers(&self) -> usize {
        self.timers.in_flight()
    }

    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}

struct SessionActor<F: Feature> {
    feature: Arc<F>,
    inbox: UnboundedReceiver<F::Action>,
    loopback: WeakUnboundedSender<F::Action>,
    timers: TimerCoordinator<F::Action>,
    state: watch::Sender<F::State>,
}

impl<F: Feature> SessionActor<F> {
    async fn run(mut self) {
        log::debug!("Session started");
        let mut state = self.feature.initial_state();

        while let Some(action) = self.inbox.recv().await {
            let now = Instant::now();
            log::trace!("{:?}", action);
            self.feature.reduce(&mut state, &action, now);
            let effect = self.feature.effect(&action, &state, now);
            self.state.send_replace(state.clone());
            self.execute(effect);
        }

        log::debug!("Session closed");
    }

    fn execute(&self, effect: Effect<F::Action>) {
        match effect {
            Effect::None => {}
            Effect::Send(next) => self.enqueue(next),
            Effect::Timer { delay, fire } => self.timers.schedule(delay, fire),
            Effect::Task(future) => {
                let loopback = self.loopback.clone();
                tokio::spawn(async move {
                    if let Some(action) = future.await {
                        if let Some(sender) = loopback.upgrade() {
                            let _ = sender.send(action);
                        }
                    }
                });
            }
        }
    }

    fn enqueue(&self, action: F::Action) {
        match self.loopback.upgrade() {
            Some(sender) => {
                let _ = sender.send(action);
            }
            None => log::trace!("Dropping follow-up of a closing session"),
        }
    }
}
