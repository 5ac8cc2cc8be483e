//! Common error types and handling for asset intake

use crate::state::StateError;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type shared by both intake flows
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate file name(s): {}", names.join(", "))]
    DuplicateName { names: Vec<String> },

    #[error("Index {index} is out of bounds for a queue of {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    #[error("Invalid state: {0}")]
    InvalidState(#[from] StateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the error code reported to callers
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::DuplicateName { .. } => "DUPLICATE_NAME",
            Error::IndexOutOfBounds { .. } => "INDEX_OUT_OF_BOUNDS",
            Error::UnknownAssetType(_) => "UNKNOWN_ASSET_TYPE",
            Error::InvalidState(_) => "INVALID_STATE",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Bounds-check an index against a queue length
    pub fn check_index(index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(())
    }
}
