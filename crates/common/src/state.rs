//! Common state machine error types
//!
//! Shared by every intake flow that implements a state machine.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} to {to} via {event}")]
    InvalidTransition {
        from: String,
        to: String,
        event: String,
    },

    #[error("Guard condition failed: {0}")]
    GuardFailed(String),

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let err = StateError::InvalidTransition {
            from: "idle".to_string(),
            to: "unknown".to_string(),
            event: "finish_upload".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot transition from idle to unknown via finish_upload"
        );
        assert_eq!(
            StateError::GuardFailed("queue is empty".to_string()).to_string(),
            "Guard condition failed: queue is empty"
        );
    }
}
