//! Synchronous store: owns a feature's state and applies actions in order
//!
//! The store reduces and resolves `Effect::Send` chains on the caller's
//! thread. It never schedules timers or runs tasks; whatever effect is left
//! over is handed back to the caller.

use crate::feature::{Effect, Feature};
use tokio::time::Instant;

pub struct Store<F: Feature> {
    feature: F,
    state: F::State,
}

impl<F: Feature> Store<F> {
    pub fn new(feature: F) -> Self {
        let state = feature.initial_state();
        Self { feature, state }
    }

    pub fn state(&self) -> &F::State {
        &self.state
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    /// Applies one action at the current instant
    pub fn send(&mut self, action: F::Action) -> Effect<F::Action> {
        self.send_at(action, Instant::now())
    }

    /// Applies one action and returns its effect unexecuted
    pub fn send_at(&mut self, action: F::Action, now: Instant) -> Effect<F::Action> {
        log::trace!("{:?}", action);
        self.feature.reduce(&mut self.state, &action, now);
        self.feature.effect(&action, &self.state, now)
    }

    /// Applies `action` and every action it sends synchronously, returning the
    /// first effect that is not a `Send`
    pub fn send_following(&mut self, action: F::Action, now: Instant) -> Effect<F::Action> {
        let mut effect = self.send_at(action, now);
        while let Effect::Send(next) = effect {
            effect = self.send_at(next, now);
        }
        effect
    }

    pub fn into_state(self) -> F::State {
        self.state
    }
}
