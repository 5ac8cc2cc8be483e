//! Mock Notification Sink
//!
//! Captures notices in memory so tests and headless runs can assert on what
//! a session reported to the user.

use std::sync::{Arc, Mutex};

use crate::{Notification, NotificationLevel, NotificationSink};

/// Mock notification sink for testing
#[derive(Debug, Clone)]
pub struct MockNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
    enabled: bool,
}

impl Default for MockNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSink {
    /// Create a new capturing sink
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
            enabled: true,
        }
    }

    /// Create a sink that silently drops every notice
    pub fn new_disabled() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
            enabled: false,
        }
    }

    /// Get all captured notices
    pub fn get_all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Messages of captured error notices, oldest first
    pub fn error_messages(&self) -> Vec<String> {
        self.messages_at(NotificationLevel::Error)
    }

    /// Messages of captured warning notices, oldest first
    pub fn warning_messages(&self) -> Vec<String> {
        self.messages_at(NotificationLevel::Warning)
    }

    /// Number of captured notices
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    /// Most recent notice
    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }

    /// Clear all captured notices
    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }

    fn messages_at(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl NotificationSink for MockNotificationSink {
    fn notify(&self, notification: Notification) {
        if !self.enabled {
            tracing::debug!(message = %notification.message, "Notification dropped (sink disabled)");
            return;
        }

        tracing::debug!(
            level = %notification.level,
            message = %notification.message,
            "Mock notification captured"
        );
        self.notifications.lock().unwrap().push(notification);
    }
}
