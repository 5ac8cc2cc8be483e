//! Intake Transfer Service
//!
//! Moves the bytes of a finalized local-asset batch and reports back to the
//! intake session through a stream of events:
//! - `TransferService`: the transport seam implemented by real backends
//! - `TransferHandle`: a cancellable task wrapping one transfer
//! - `SimulatedTransfer`: timer-driven transfer with a fixed duration
//! - `MockTransferService`: programmable mock with request recording

pub mod handle;
pub mod mock;
pub mod simulated;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use intake_common::IntakeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use handle::{ProgressReporter, TransferHandle};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Transfer configuration error: {0}")]
    Configuration(String),

    #[error("Transfer request error: {0}")]
    Request(String),

    #[error("Transfer failed: {0}")]
    Failed(String),
}

/// One file in a transfer request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferItem {
    pub entry_id: Uuid,
    pub name: String,
    /// Opaque file handle supplied by the file picker
    pub handle: String,
    pub asset_type: String,
}

/// A batch handed to the transport when an upload starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub session_id: Uuid,
    pub items: Vec<TransferItem>,
}

impl TransferRequest {
    /// Reject requests the transport cannot act on
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.items.is_empty() {
            return Err(TransferError::Request(
                "Transfer request contains no items".to_string(),
            ));
        }
        if let Some(item) = self.items.iter().find(|i| i.handle.is_empty()) {
            return Err(TransferError::Request(format!(
                "File '{}' has an empty handle",
                item.name
            )));
        }
        Ok(())
    }
}

/// Confirmation that every item in a request was transferred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub session_id: Uuid,
    pub transferred: usize,
    pub provider: String,
    pub completed_at: DateTime<Utc>,
}

impl TransferReceipt {
    pub fn new(request: &TransferRequest, provider: impl Into<String>) -> Self {
        Self {
            session_id: request.session_id,
            transferred: request.items.len(),
            provider: provider.into(),
            completed_at: Utc::now(),
        }
    }
}

/// Event emitted by a running transfer
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// Absolute progress in percent; may overshoot 100
    Progress(u8),
    /// The transfer completed
    Finished(TransferReceipt),
    /// The transfer failed with a reason
    Failed(String),
}

impl TransferEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Failed(_))
    }
}

/// Transfer service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    pub provider: String,
    pub tick_ms: u64,
    pub duration_ms: u64,
    pub initial_percent: u8,
    pub step_percent: u8,
}

impl From<&IntakeConfig> for TransferConfig {
    fn from(config: &IntakeConfig) -> Self {
        Self {
            provider: config.transfer_provider.clone(),
            tick_ms: config.progress_tick_ms,
            duration_ms: config.simulated_upload_ms,
            initial_percent: config.progress.initial_percent,
            step_percent: config.progress.step_percent,
        }
    }
}

/// Transfer service trait for different transport backends
#[async_trait::async_trait]
pub trait TransferService: Send + Sync {
    /// Transfer every item of the request, reporting progress as it goes.
    /// Resolves once the transfer has finished or failed.
    async fn transfer(
        &self,
        request: TransferRequest,
        progress: ProgressReporter,
    ) -> Result<TransferReceipt, TransferError>;
}

/// Factory for creating TransferService implementations
pub struct TransferServiceFactory;

impl TransferServiceFactory {
    pub fn create(config: &TransferConfig) -> Result<Arc<dyn TransferService>, TransferError> {
        match config.provider.as_str() {
            "simulated" => {
                tracing::info!(
                    tick_ms = config.tick_ms,
                    duration_ms = config.duration_ms,
                    "Creating simulated transfer service"
                );
                Ok(Arc::new(simulated::SimulatedTransfer::from_config(config)))
            }
            "mock" => {
                tracing::info!("Creating mock transfer service");
                Ok(Arc::new(mock::MockTransferService::new()))
            }
            provider => Err(TransferError::Configuration(format!(
                "Unknown transfer provider: {}. Supported providers: simulated, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, handle: &str) -> TransferItem {
        TransferItem {
            entry_id: Uuid::new_v4(),
            name: name.to_string(),
            handle: handle.to_string(),
            asset_type: "Report".to_string(),
        }
    }

    #[test]
    fn test_request_validation() {
        let request = TransferRequest {
            session_id: Uuid::new_v4(),
            items: vec![item("a.pdf", "h1")],
        };
        assert!(request.validate().is_ok());

        let empty = TransferRequest {
            session_id: Uuid::new_v4(),
            items: vec![],
        };
        assert!(matches!(empty.validate(), Err(TransferError::Request(_))));

        let blank_handle = TransferRequest {
            session_id: Uuid::new_v4(),
            items: vec![item("a.pdf", "")],
        };
        assert!(matches!(
            blank_handle.validate(),
            Err(TransferError::Request(_))
        ));
    }

    #[test]
    fn test_receipt_counts_items() {
        let request = TransferRequest {
            session_id: Uuid::new_v4(),
            items: vec![item("a.pdf", "h1"), item("b.pdf", "h2")],
        };
        let receipt = TransferReceipt::new(&request, "mock");
        assert_eq!(receipt.session_id, request.session_id);
        assert_eq!(receipt.transferred, 2);
        assert_eq!(receipt.provider, "mock");
    }

    #[test]
    fn test_event_is_terminal() {
        assert!(!TransferEvent::Progress(50).is_terminal());
        assert!(TransferEvent::Failed("x".to_string()).is_terminal());
    }

    #[test]
    fn test_config_from_intake_config() {
        let config = TransferConfig::from(&IntakeConfig::default());
        assert_eq!(config.provider, "simulated");
        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.duration_ms, 3000);
        assert_eq!(config.initial_percent, 10);
        assert_eq!(config.step_percent, 20);
    }

    #[test]
    fn test_factory_providers() {
        let mut config = TransferConfig::from(&IntakeConfig::default());
        assert!(TransferServiceFactory::create(&config).is_ok());

        config.provider = "mock".to_string();
        assert!(TransferServiceFactory::create(&config).is_ok());

        config.provider = "carrier-pigeon".to_string();
        assert!(matches!(
            TransferServiceFactory::create(&config),
            Err(TransferError::Configuration(_))
        ));
    }
}
