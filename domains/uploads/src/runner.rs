//! Drives a session through one transfer

use std::sync::Arc;

use intake_common::Result;
use intake_transport::{TransferEvent, TransferHandle, TransferService};

use crate::domain::state::UploadPhase;
use crate::session::LocalAssetIntake;

const STREAM_CLOSED: &str = "Transfer ended without reporting a result";

/// Start the upload, apply transport events to the session until the transfer
/// finishes or fails, and return the phase the session ends in.
///
/// Must be called from within a tokio runtime.
pub async fn run_upload(
    session: &mut LocalAssetIntake,
    service: Arc<dyn TransferService>,
) -> Result<UploadPhase> {
    let request = session.start_upload()?;
    let mut handle = TransferHandle::spawn(service, request);

    while let Some(event) = handle.next_event().await {
        match event {
            TransferEvent::Progress(percent) => {
                let shown = session.report_progress(percent);
                tracing::debug!(session_id = %session.id(), reported = percent, shown, "Upload progress");
            }
            TransferEvent::Finished(receipt) => {
                tracing::debug!(
                    session_id = %session.id(),
                    provider = %receipt.provider,
                    transferred = receipt.transferred,
                    "Transfer receipt received"
                );
                session.finish_upload()?;
                return Ok(session.phase());
            }
            TransferEvent::Failed(reason) => {
                session.fail_upload(reason)?;
                return Ok(session.phase());
            }
        }
    }

    session.fail_upload(STREAM_CLOSED)?;
    Ok(session.phase())
}
