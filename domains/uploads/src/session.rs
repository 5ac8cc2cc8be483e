//! Local-asset intake session
//!
//! Owns the pending queue and the upload phase. Queue edits are only legal
//! while idle; the transport drives the uploading phase through
//! `report_progress`, `finish_upload` and `fail_upload`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use intake_common::{AssetTypeCatalog, Error, ProgressSettings, Result, StateError};
use intake_notify::NotificationSink;
use intake_transport::{TransferItem, TransferRequest};
use uuid::Uuid;

use crate::domain::entities::{
    batch_is_valid, FileCandidate, PendingLocalAsset, UploadProgress, UploadSession,
};
use crate::domain::state::{UploadEvent, UploadPhase, UploadStateMachine};

/// Message shown to the user when an add is rejected for duplicate names
pub const DUPLICATE_FILE_MESSAGE: &str = "File duplicated";

/// Receives a completed session once the user acknowledges it
pub trait UploadCommitHandler {
    fn on_upload_done(&mut self, session: UploadSession);
}

impl<F> UploadCommitHandler for F
where
    F: FnMut(UploadSession),
{
    fn on_upload_done(&mut self, session: UploadSession) {
        self(session)
    }
}

pub struct LocalAssetIntake {
    id: Uuid,
    catalog: Arc<AssetTypeCatalog>,
    notifier: Arc<dyn NotificationSink>,
    settings: ProgressSettings,
    queue: Vec<PendingLocalAsset>,
    phase: UploadPhase,
    progress: UploadProgress,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for LocalAssetIntake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAssetIntake")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("queue", &self.queue)
            .field("progress", &self.progress)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl LocalAssetIntake {
    pub fn new(catalog: Arc<AssetTypeCatalog>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            notifier,
            settings: ProgressSettings::default(),
            queue: Vec::new(),
            phase: UploadPhase::Idle,
            progress: UploadProgress::default(),
            last_error: None,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn with_settings(mut self, settings: ProgressSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn queue(&self) -> &[PendingLocalAsset] {
        &self.queue
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn title(&self) -> &'static str {
        self.phase.title()
    }

    pub fn progress(&self) -> u8 {
        self.progress.percent()
    }

    /// Reason of the most recent transport failure, cleared on the next start
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn catalog(&self) -> &AssetTypeCatalog {
        &self.catalog
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Label shown while the batch is being transferred
    pub fn uploading_label(&self) -> Option<String> {
        (self.phase == UploadPhase::Uploading)
            .then(|| format!("Uploading {} files...", self.queue.len()))
    }

    fn ensure_editable(&self, action: &str) -> Result<()> {
        if !self.phase.is_editable() {
            return Err(StateError::GuardFailed(format!(
                "Cannot {} while the session is {}",
                action, self.phase
            ))
            .into());
        }
        Ok(())
    }

    /// Append picked files to the queue.
    ///
    /// A name already queued, or repeated within `candidates`, rejects the
    /// whole batch: nothing is added and the user is notified once.
    pub fn add_files(&mut self, candidates: Vec<FileCandidate>) -> Result<usize> {
        self.ensure_editable("add files")?;

        let mut seen: HashSet<&str> = self.queue.iter().map(|a| a.name.as_str()).collect();
        let mut duplicates: Vec<String> = Vec::new();
        for candidate in &candidates {
            if !seen.insert(candidate.name.as_str())
                && !duplicates.iter().any(|d| d == &candidate.name)
            {
                duplicates.push(candidate.name.clone());
            }
        }

        if !duplicates.is_empty() {
            tracing::warn!(
                session_id = %self.id,
                duplicates = ?duplicates,
                queue_len = self.queue.len(),
                "Rejected file batch with duplicate names"
            );
            self.notifier.notify_error(DUPLICATE_FILE_MESSAGE);
            return Err(Error::DuplicateName { names: duplicates });
        }

        let added = candidates.len();
        self.queue
            .extend(candidates.into_iter().map(PendingLocalAsset::from_candidate));

        tracing::debug!(
            session_id = %self.id,
            added,
            queue_len = self.queue.len(),
            "Files queued"
        );
        Ok(added)
    }

    /// Classify the entry at `index` with a catalog type
    pub fn set_type(&mut self, index: usize, asset_type: &str) -> Result<()> {
        self.ensure_editable("change a file type")?;
        Error::check_index(index, self.queue.len())?;
        let resolved = self.catalog.resolve(asset_type)?.name.clone();

        tracing::debug!(session_id = %self.id, index, asset_type = %resolved, "File classified");
        self.queue[index].asset_type = Some(resolved);
        Ok(())
    }

    /// Remove the entry at `index`, keeping the order of the rest
    pub fn remove(&mut self, index: usize) -> Result<PendingLocalAsset> {
        self.ensure_editable("remove a file")?;
        Error::check_index(index, self.queue.len())?;

        let removed = self.queue.remove(index);
        tracing::debug!(
            session_id = %self.id,
            index,
            name = %removed.name,
            queue_len = self.queue.len(),
            "File removed"
        );
        Ok(removed)
    }

    /// Recomputed from the current queue on every call
    pub fn can_start_upload(&self) -> bool {
        UploadStateMachine::can_transition(self.phase, &UploadEvent::StartUpload)
            && batch_is_valid(&self.queue)
    }

    /// Freeze the queue and enter the uploading phase.
    ///
    /// Returns the request to hand to the transport.
    pub fn start_upload(&mut self) -> Result<TransferRequest> {
        let next = UploadStateMachine::transition(self.phase, UploadEvent::StartUpload)?;
        if !batch_is_valid(&self.queue) {
            return Err(StateError::GuardFailed(
                "Every file needs a file handle and a type before uploading".to_string(),
            )
            .into());
        }

        let items = self
            .queue
            .iter()
            .filter_map(|asset| match (&asset.handle, &asset.asset_type) {
                (Some(handle), Some(asset_type)) => Some(TransferItem {
                    entry_id: asset.id,
                    name: asset.name.clone(),
                    handle: handle.as_str().to_string(),
                    asset_type: asset_type.clone(),
                }),
                _ => None,
            })
            .collect();

        self.phase = next;
        self.progress.reset();
        self.progress.report(self.settings.initial_percent);
        self.last_error = None;
        self.started_at = Some(Utc::now());
        self.completed_at = None;

        tracing::info!(
            session_id = %self.id,
            phase = %self.phase,
            queue_len = self.queue.len(),
            "Upload started"
        );

        Ok(TransferRequest {
            session_id: self.id,
            items,
        })
    }

    /// Advance progress by the configured step. Ignored outside the uploading phase.
    pub fn tick_progress(&mut self) -> u8 {
        if self.phase == UploadPhase::Uploading {
            self.progress.advance(self.settings.step_percent);
        }
        self.progress.percent()
    }

    /// Apply an absolute progress report. Ignored outside the uploading phase.
    pub fn report_progress(&mut self, percent: u8) -> u8 {
        if self.phase == UploadPhase::Uploading {
            self.progress.report(percent);
        }
        self.progress.percent()
    }

    pub fn finish_upload(&mut self) -> Result<()> {
        self.phase = UploadStateMachine::transition(self.phase, UploadEvent::TransferFinished)?;
        self.progress.complete();
        self.completed_at = Some(Utc::now());

        tracing::info!(
            session_id = %self.id,
            phase = %self.phase,
            queue_len = self.queue.len(),
            "Upload complete"
        );
        Ok(())
    }

    /// Return to idle after a transport failure. The queue is kept for a retry.
    pub fn fail_upload(&mut self, reason: impl Into<String>) -> Result<()> {
        let reason = reason.into();
        self.phase = UploadStateMachine::transition(self.phase, UploadEvent::TransferFailed)?;
        self.progress.reset();
        self.started_at = None;

        tracing::warn!(
            session_id = %self.id,
            phase = %self.phase,
            reason = %reason,
            "Upload failed"
        );
        self.notifier
            .notify_warning(&format!("Upload failed: {}", reason));
        self.last_error = Some(reason);
        Ok(())
    }

    /// Hand the completed session to `handler`, then reset to an empty idle session
    pub fn done<H>(&mut self, handler: &mut H) -> Result<()>
    where
        H: UploadCommitHandler + ?Sized,
    {
        UploadStateMachine::transition(self.phase, UploadEvent::Done)?;

        let session = self.snapshot();
        tracing::info!(
            session_id = %self.id,
            queue_len = session.queue.len(),
            "Upload committed"
        );
        handler.on_upload_done(session);
        self.reset();
        Ok(())
    }

    /// Discard the session from any phase without committing
    pub fn cancel(&mut self) {
        let from = self.phase;
        self.phase = UploadStateMachine::transition(from, UploadEvent::Cancel)
            .unwrap_or(UploadPhase::Idle);
        tracing::info!(
            session_id = %self.id,
            from = %from,
            queue_len = self.queue.len(),
            "Upload session discarded"
        );
        self.reset();
    }

    pub fn snapshot(&self) -> UploadSession {
        UploadSession {
            session_id: self.id,
            queue: self.queue.clone(),
            phase: self.phase,
            title: self.title().to_string(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.queue.clear();
        self.phase = UploadPhase::Idle;
        self.progress.reset();
        self.last_error = None;
        self.started_at = None;
        self.completed_at = None;
    }
}
