//! Intake Notification Sink
//!
//! Surfaces user-facing notices raised by intake sessions:
//! - Tracing-backed sink for running applications
//! - Mock sink capturing notices for tests and headless runs
//!
//! Notices are fire-and-forget. A sink never reports failure back to the
//! session that raised the notice.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use intake_common::IntakeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod mock;
pub mod tracing_sink;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification configuration error: {0}")]
    Configuration(String),
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
    Warning,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single user-facing notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }
}

/// Sink for user-facing notices
pub trait NotificationSink: Send + Sync {
    /// Deliver a notice
    fn notify(&self, notification: Notification);

    /// Deliver an error notice
    fn notify_error(&self, message: &str) {
        self.notify(Notification::error(message));
    }

    /// Deliver a warning notice
    fn notify_warning(&self, message: &str) {
        self.notify(Notification::warning(message));
    }
}

/// Notification sink configuration
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Sink provider (log, mock)
    pub provider: String,
    /// Deliver notices at all (disabled sinks drop everything)
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            provider: "log".to_string(),
            enabled: true,
        }
    }
}

impl From<&IntakeConfig> for NotifyConfig {
    fn from(config: &IntakeConfig) -> Self {
        Self {
            provider: config.notify_provider.clone(),
            enabled: config.notify_enabled,
        }
    }
}

/// Notification sink factory
pub struct NotificationSinkFactory;

impl NotificationSinkFactory {
    /// Create a sink based on configuration
    pub fn create(config: &NotifyConfig) -> Result<Arc<dyn NotificationSink>, NotifyError> {
        if !config.enabled {
            tracing::info!("Notifications disabled, using a discarding mock sink");
            return Ok(Arc::new(mock::MockNotificationSink::new_disabled()));
        }

        match config.provider.as_str() {
            "log" | "tracing" => {
                tracing::info!("Creating tracing notification sink");
                Ok(Arc::new(tracing_sink::TracingNotificationSink::new()))
            }
            "mock" => {
                tracing::info!("Creating mock notification sink");
                Ok(Arc::new(mock::MockNotificationSink::new()))
            }
            provider => Err(NotifyError::Configuration(format!(
                "Unknown notification provider: {}. Supported providers: log, mock",
                provider
            ))),
        }
    }
}
