//! Session-specific error types
//!
//! Errors raised by the session actor and the session registry. The matcher
//! itself cannot fail.

use thiserror::Error;

/// Errors that can occur while talking to a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session is registered under the given ID
    #[error("Session not found: {0}")]
    NotFound(String),

    /// The session actor has stopped and no longer accepts commands
    #[error("Session {0} is no longer running")]
    ActorStopped(String),

    /// Registry is full
    #[error("Session limit of {0} reached")]
    CapacityReached(usize),
}
