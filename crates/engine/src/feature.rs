//! Reducer + effect pattern shared by every feature
//!
//! A feature is a pure transition function plus an effect function that
//! describes, as a value, the follow-up work of each transition. Nothing in
//! here touches the clock or the runtime; [`Store`](crate::Store) and
//! [`Session`](crate::Session) execute the effects.

use futures::future::BoxFuture;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Follow-up work of one transition
pub enum Effect<A> {
    /// Nothing to do
    None,
    /// Dispatch another action right away
    Send(A),
    /// Dispatch `fire` once `delay` has elapsed
    Timer { delay: Duration, fire: A },
    /// Run an async job; its result, if any, is dispatched
    Task(BoxFuture<'static, Option<A>>),
}

impl<A> Effect<A> {
    pub fn task<Fut>(future: Fut) -> Self
    where
        Fut: std::future::Future<Output = Option<A>> + Send + 'static,
    {
        Self::Task(Box::pin(future))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<A: fmt::Debug> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Send(action) => f.debug_tuple("Send").field(action).finish(),
            Self::Timer { delay, fire } => f
                .debug_struct("Timer")
                .field("delay", delay)
                .field("fire", fire)
                .finish(),
            Self::Task(_) => write!(f, "Task(..)"),
        }
    }
}

/// Tasks are opaque and never compare equal
impl<A: PartialEq> PartialEq for Effect<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Send(a), Self::Send(b)) => a == b,
            (
                Self::Timer { delay: d1, fire: f1 },
                Self::Timer { delay: d2, fire: f2 },
            ) => d1 == d2 && f1 == f2,
            _ => false,
        }
    }
}

pub trait Feature: Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;
    type Action: fmt::Debug + Send + 'static;

    fn initial_state(&self) -> Self::State;

    /// Applies `action` to `state`. Must not block or perform I/O.
    fn reduce(&self, state: &mut Self::State, action: &Self::Action, now: Instant);

    /// Decides the follow-up of `action`, given the state it produced
    fn effect(&self, action: &Self::Action, state: &Self::State, now: Instant)
        -> Effect<Self::Action>;
}
