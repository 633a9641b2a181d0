// FILE: crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
