//! Uploads domain: local-file intake queue, phase state machine, upload runner

pub mod domain;
pub mod runner;
pub mod session;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    batch_is_valid, FileCandidate, FileHandle, PendingLocalAsset, UploadProgress, UploadSession,
};
pub use domain::state::{UploadEvent, UploadPhase, UploadStateMachine};

pub use runner::run_upload;
pub use session::{LocalAssetIntake, UploadCommitHandler, DUPLICATE_FILE_MESSAGE};
