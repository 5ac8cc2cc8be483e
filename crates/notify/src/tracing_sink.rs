//! Tracing-backed notification sink
//!
//! Emits every notice as a structured tracing event. The embedding
//! application decides where those events end up.

use crate::{Notification, NotificationLevel, NotificationSink};

#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!(
                notification_id = %notification.id,
                raised_at = %notification.raised_at,
                "{}",
                notification.message
            ),
            NotificationLevel::Warning => tracing::warn!(
                notification_id = %notification.id,
                raised_at = %notification.raised_at,
                "{}",
                notification.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_tracing_sink_accepts_all_levels() {
        let sink = TracingNotificationSink::new();
        sink.notify_error("File duplicated");
        sink.notify_warning("Upload failed: connection reset");
    }
}
