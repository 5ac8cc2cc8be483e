//! State machine for local upload phases
//!
//! Upload phases: Idle → Uploading → Complete; Uploading → Idle on transfer
//! failure; Complete → Idle once the batch is handed off. Cancel returns any
//! phase to Idle. Complete accepts nothing but the two discard events.

use intake_common::StateError;
use serde::{Deserialize, Serialize};

/// Lifecycle phases of a local-asset intake session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Complete,
}

impl UploadPhase {
    /// Check if this is a terminal state (only discard events leave it)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether the queue may be edited in this phase
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [UploadPhase] {
        match self {
            Self::Idle => &[Self::Uploading],
            Self::Uploading => &[Self::Complete, Self::Idle],
            Self::Complete => &[Self::Idle],
        }
    }

    /// Caller-facing title for this phase
    pub fn title(&self) -> &'static str {
        match self {
            Self::Idle => "Upload files",
            Self::Uploading => "Uploading...",
            Self::Complete => "Upload Complete",
        }
    }
}

impl std::fmt::Display for UploadPhase {
    #[mutants::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Uploading => write!(f, "uploading"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Events that trigger upload phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEvent {
    /// User starts the batch upload
    StartUpload,
    /// Transport signalled that every file was transferred
    TransferFinished,
    /// Transport signalled a failure
    TransferFailed,
    /// User acknowledged the completed upload; the batch is committed
    Done,
    /// User closed or cancelled the session
    Cancel,
}

impl std::fmt::Display for UploadEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartUpload => write!(f, "start_upload"),
            Self::TransferFinished => write!(f, "transfer_finished"),
            Self::TransferFailed => write!(f, "transfer_failed"),
            Self::Done => write!(f, "done"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// Upload phase state machine
pub struct UploadStateMachine;

impl UploadStateMachine {
    /// Attempt a state transition
    pub fn transition(current: UploadPhase, event: UploadEvent) -> Result<UploadPhase, StateError> {
        let next = match (&current, &event) {
            // From Idle
            (UploadPhase::Idle, UploadEvent::StartUpload) => UploadPhase::Uploading,

            // From Uploading
            (UploadPhase::Uploading, UploadEvent::TransferFinished) => UploadPhase::Complete,
            (UploadPhase::Uploading, UploadEvent::TransferFailed) => UploadPhase::Idle,

            // From Complete
            (UploadPhase::Complete, UploadEvent::Done) => UploadPhase::Idle,

            // Close/cancel is accepted everywhere
            (_, UploadEvent::Cancel) => UploadPhase::Idle,

            _ if current.is_terminal() => {
                return Err(StateError::TerminalState(current.to_string()));
            }

            // Invalid transitions
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: UploadPhase, event: &UploadEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
