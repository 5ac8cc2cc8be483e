//! Timer-driven transfer
//!
//! Stand-in for a real transport: progress starts at the initial
//! percent, grows by a fixed step on every tick until it reaches 100, and the
//! transfer completes once the configured duration has elapsed. Reported
//! values may overshoot 100; the session clamps them.

use std::time::Duration;

use crate::{
    ProgressReporter, TransferConfig, TransferError, TransferReceipt, TransferRequest,
    TransferService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedTransfer {
    tick: Duration,
    duration: Duration,
    initial_percent: u8,
    step_percent: u8,
}

impl SimulatedTransfer {
    pub fn new(tick: Duration, duration: Duration, initial_percent: u8, step_percent: u8) -> Self {
        Self {
            tick: tick.max(Duration::from_millis(1)),
            duration,
            initial_percent,
            step_percent,
        }
    }

    pub fn from_config(config: &TransferConfig) -> Self {
        Self::new(
            Duration::from_millis(config.tick_ms),
            Duration::from_millis(config.duration_ms),
            config.initial_percent,
            config.step_percent,
        )
    }
}

#[async_trait::async_trait]
impl TransferService for SimulatedTransfer {
    async fn transfer(
        &self,
        request: TransferRequest,
        progress: ProgressReporter,
    ) -> Result<TransferReceipt, TransferError> {
        request.validate()?;

        tracing::debug!(
            session_id = %request.session_id,
            items = request.items.len(),
            "Simulated transfer started"
        );

        let deadline = tokio::time::sleep(self.duration);
        tokio::pin!(deadline);

        let mut ticker = tokio::time::interval(self.tick);
        // The first tick of an interval completes immediately
        ticker.tick().await;

        let mut percent = u16::from(self.initial_percent);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = ticker.tick(), if percent < 100 => {
                    percent += u16::from(self.step_percent);
                    progress.report(percent.min(u16::from(u8::MAX)) as u8);
                }
            }
        }

        Ok(TransferReceipt::new(&request, "simulated"))
    }
}
