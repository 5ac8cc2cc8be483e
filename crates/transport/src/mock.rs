//! Mock Transfer Service Implementation
//!
//! Programmable mock for testing upload workflows:
//! - `MockTransferService`: configurable mock with request recording
//! - `MockTransferBehavior`: controls outcome, delay, progress steps
//! - `MockOutcome`: Complete, Fail, or Timeout

use std::sync::{Arc, Mutex, RwLock};

use uuid::Uuid;

use crate::{ProgressReporter, TransferError, TransferReceipt, TransferRequest, TransferService};

const DEFAULT_DELAY_MS: u64 = 10;
const DEFAULT_FAILURE: &str = "Mock transfer failure";

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Finish successfully with a receipt
    #[default]
    Complete,
    /// Fail with the configured error message
    Fail,
    /// Never resolve (simulates a hung transport)
    Timeout,
}

/// Programmable behavior for the mock transfer service
#[derive(Debug, Clone)]
pub struct MockTransferBehavior {
    pub outcome: Arc<RwLock<MockOutcome>>,
    pub delay_ms: Arc<RwLock<u64>>,
    pub progress_steps: Arc<RwLock<Vec<u8>>>,
    pub error_message: Arc<RwLock<Option<String>>>,
}

impl Default for MockTransferBehavior {
    fn default() -> Self {
        Self {
            outcome: Arc::new(RwLock::new(MockOutcome::Complete)),
            delay_ms: Arc::new(RwLock::new(DEFAULT_DELAY_MS)),
            progress_steps: Arc::new(RwLock::new(Vec::new())),
            error_message: Arc::new(RwLock::new(None)),
        }
    }
}

impl MockTransferBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock outcome
    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.write().unwrap() = outcome;
    }

    /// Configure delay before the first progress report
    pub fn set_delay_ms(&self, delay: u64) {
        *self.delay_ms.write().unwrap() = delay;
    }

    /// Configure progress values reported before the final outcome
    pub fn set_progress_steps(&self, steps: Vec<u8>) {
        *self.progress_steps.write().unwrap() = steps;
    }

    /// Configure the failure reason for the Fail outcome
    pub fn set_error_message(&self, message: impl Into<String>) {
        *self.error_message.write().unwrap() = Some(message.into());
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        *self.outcome.write().unwrap() = MockOutcome::Complete;
        *self.delay_ms.write().unwrap() = DEFAULT_DELAY_MS;
        *self.progress_steps.write().unwrap() = Vec::new();
        *self.error_message.write().unwrap() = None;
    }

    /// Read current outcome
    pub fn get_outcome(&self) -> MockOutcome {
        self.outcome.read().unwrap().clone()
    }

    /// Read current delay
    pub fn get_delay_ms(&self) -> u64 {
        *self.delay_ms.read().unwrap()
    }
}

/// A recorded transfer request for test assertions
#[derive(Debug, Clone)]
pub struct RecordedTransferRequest {
    pub session_id: Uuid,
    pub names: Vec<String>,
    pub asset_types: Vec<String>,
}

/// Mock transfer service with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockTransferService {
    behavior: Arc<MockTransferBehavior>,
    history: Arc<Mutex<Vec<RecordedTransferRequest>>>,
}

impl MockTransferService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: Arc<MockTransferBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the shared behavior for external configuration
    pub fn behavior(&self) -> &Arc<MockTransferBehavior> {
        &self.behavior
    }

    /// Get recorded transfer requests
    pub fn recorded_requests(&self) -> Vec<RecordedTransferRequest> {
        self.history.lock().unwrap().clone()
    }

    /// Clear history
    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl TransferService for MockTransferService {
    async fn transfer(
        &self,
        request: TransferRequest,
        progress: ProgressReporter,
    ) -> Result<TransferReceipt, TransferError> {
        tracing::info!(session_id = %request.session_id, items = request.items.len(), "Mock transfer: received request");

        {
            let recorded = RecordedTransferRequest {
                session_id: request.session_id,
                names: request.items.iter().map(|i| i.name.clone()).collect(),
                asset_types: request.items.iter().map(|i| i.asset_type.clone()).collect(),
            };
            self.history.lock().unwrap().push(recorded);
        }

        request.validate()?;

        // Read behavior settings
        let outcome = self.behavior.get_outcome();
        let delay_ms = self.behavior.get_delay_ms();
        let progress_steps = self.behavior.progress_steps.read().unwrap().clone();
        let error_message = self.behavior.error_message.read().unwrap().clone();

        if outcome == MockOutcome::Timeout {
            tracing::info!(session_id = %request.session_id, "Mock transfer: simulating hung transport");
            std::future::pending::<()>().await;
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;

        for step in progress_steps {
            progress.report(step);
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        }

        match outcome {
            MockOutcome::Fail => Err(TransferError::Failed(
                error_message.unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            )),
            _ => Ok(TransferReceipt::new(&request, "mock")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TransferEvent, TransferItem};
    use tokio::sync::mpsc;

    fn request(names: &[&str]) -> TransferRequest {
        TransferRequest {
            session_id: Uuid::new_v4(),
            items: names
                .iter()
                .map(|name| TransferItem {
                    entry_id: Uuid::new_v4(),
                    name: name.to_string(),
                    handle: format!("picker:{}", name),
                    asset_type: "Report".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_behavior_defaults_and_reset() {
        let behavior = MockTransferBehavior::new();
        assert_eq!(behavior.get_outcome(), MockOutcome::Complete);
        assert_eq!(behavior.get_delay_ms(), DEFAULT_DELAY_MS);

        behavior.set_outcome(MockOutcome::Fail);
        behavior.set_delay_ms(500);
        behavior.set_progress_steps(vec![50]);
        behavior.set_error_message("disk full");
        behavior.reset();

        assert_eq!(behavior.get_outcome(), MockOutcome::Complete);
        assert_eq!(behavior.get_delay_ms(), DEFAULT_DELAY_MS);
        assert!(behavior.progress_steps.read().unwrap().is_empty());
        assert!(behavior.error_message.read().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_requests_and_reports_progress() {
        let service = MockTransferService::new();
        service.behavior().set_delay_ms(0);
        service.behavior().set_progress_steps(vec![25, 75]);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let receipt = service
            .transfer(request(&["a.pdf", "b.png"]), ProgressReporter::new(tx))
            .await
            .unwrap();

        assert_eq!(receipt.transferred, 2);
        assert_eq!(rx.recv().await, Some(TransferEvent::Progress(25)));
        assert_eq!(rx.recv().await, Some(TransferEvent::Progress(75)));

        let recorded = service.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].names, vec!["a.pdf", "b.png"]);

        service.reset_history();
        assert!(service.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_fail_outcome_uses_configured_message() {
        let service = MockTransferService::new();
        service.behavior().set_delay_ms(0);
        service.behavior().set_outcome(MockOutcome::Fail);
        service.behavior().set_error_message("connection reset");

        let (tx, _rx) = mpsc::unbounded_channel();
        let result = service
            .transfer(request(&["a.pdf"]), ProgressReporter::new(tx))
            .await;
        assert_eq!(
            result,
            Err(TransferError::Failed("connection reset".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let service = MockTransferService::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = service.transfer(request(&[]), ProgressReporter::new(tx)).await;
        assert!(matches!(result, Err(TransferError::Request(_))));
        // Rejected requests are still recorded
        assert_eq!(service.recorded_requests().len(), 1);
    }
}
