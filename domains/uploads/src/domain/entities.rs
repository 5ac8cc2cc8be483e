//! Domain entities for local uploads
//!
//! Files picked by the user, the pending queue entries built from them, the
//! progress indicator, and the snapshot handed to the commit handler.

use chrono::{DateTime, Utc};
use intake_common::extension_of;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::state::UploadPhase;

/// Opaque reference to a picked file, owned by the file picker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHandle(String);

impl FileHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file descriptor delivered by the file picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    pub name: String,
    #[serde(default)]
    pub handle: Option<FileHandle>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, handle: FileHandle) -> Self {
        Self {
            name: name.into(),
            handle: Some(handle),
        }
    }

    /// A candidate whose underlying file object is missing
    pub fn without_handle(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }
}

/// A queued file awaiting classification and upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLocalAsset {
    pub id: Uuid,
    pub name: String,
    pub handle: Option<FileHandle>,
    pub asset_type: Option<String>,
}

impl PendingLocalAsset {
    /// Queue entry for a freshly picked file; always starts unclassified
    pub fn from_candidate(candidate: FileCandidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name,
            handle: candidate.handle,
            asset_type: None,
        }
    }

    /// Ready for upload: has a file handle and an assigned type
    pub fn is_ready(&self) -> bool {
        self.handle.is_some() && self.asset_type.is_some()
    }

    /// Text after the last `.` of the name
    pub fn extension(&self) -> &str {
        extension_of(&self.name)
    }
}

/// The batch is uploadable iff it is non-empty and every entry is ready
pub fn batch_is_valid(queue: &[PendingLocalAsset]) -> bool {
    !queue.is_empty() && queue.iter().all(PendingLocalAsset::is_ready)
}

/// Progress indicator, in percent. Never decreases and never exceeds 100
/// until explicitly reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawProgress")]
pub struct UploadProgress {
    percent: u8,
}

#[derive(Deserialize)]
struct RawProgress {
    percent: u8,
}

impl From<RawProgress> for UploadProgress {
    fn from(raw: RawProgress) -> Self {
        let mut progress = Self::default();
        progress.report(raw.percent);
        progress
    }
}

impl UploadProgress {
    pub const FULL: u8 = 100;

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_full(&self) -> bool {
        self.percent >= Self::FULL
    }

    /// Advance by a relative step
    pub fn advance(&mut self, step: u8) -> u8 {
        self.percent = self.percent.saturating_add(step).min(Self::FULL);
        self.percent
    }

    /// Apply an absolute report; stale or oversized values are absorbed
    pub fn report(&mut self, percent: u8) -> u8 {
        self.percent = self.percent.max(percent.min(Self::FULL));
        self.percent
    }

    pub fn complete(&mut self) {
        self.percent = Self::FULL;
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }
}

/// Snapshot of a session handed to the commit handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSession {
    pub session_id: Uuid,
    pub queue: Vec<PendingLocalAsset>,
    pub phase: UploadPhase,
    pub title: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
