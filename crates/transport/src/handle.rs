//! Cancellable transfer task
//!
//! A `TransferHandle` owns the tokio task running one transfer. Events are
//! delivered in order and the stream always ends with exactly one terminal
//! event, unless the task is cancelled, in which case it simply closes.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{TransferEvent, TransferRequest, TransferService};

/// Progress channel handed to a transfer service
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<TransferEvent>,
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<TransferEvent>) -> Self {
        Self { tx }
    }

    /// Report absolute progress. Ignored once the receiving side is gone.
    pub fn report(&self, percent: u8) {
        let _ = self.tx.send(TransferEvent::Progress(percent));
    }

    /// Whether anyone is still listening
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle to a transfer running on a background task
#[derive(Debug)]
pub struct TransferHandle {
    events: mpsc::UnboundedReceiver<TransferEvent>,
    task: JoinHandle<()>,
}

impl TransferHandle {
    /// Spawn the transfer. Must be called from within a tokio runtime.
    pub fn spawn(service: Arc<dyn TransferService>, request: TransferRequest) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let reporter = ProgressReporter::new(tx.clone());
        let session_id = request.session_id;

        let task = tokio::spawn(async move {
            let event = match service.transfer(request, reporter).await {
                Ok(receipt) => {
                    tracing::debug!(%session_id, transferred = receipt.transferred, "Transfer finished");
                    TransferEvent::Finished(receipt)
                }
                Err(e) => {
                    tracing::warn!(%session_id, error = %e, "Transfer failed");
                    TransferEvent::Failed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });

        Self { events, task }
    }

    /// Next event, or `None` once the stream has closed
    pub async fn next_event(&mut self) -> Option<TransferEvent> {
        self.events.recv().await
    }

    /// Abort the transfer task. The event stream closes without a terminal event.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for TransferHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
