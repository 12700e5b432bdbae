//! # Transient Status Slot
//!
//! Single-slot status display with self-clearing timers. Each shown message
//! bumps a monotonic generation; a clear timer only takes effect while its
//! generation is still the one on display, so a stale timer can never
//! truncate a newer message.

use crate::config::timing::STATUS_CLEAR_AFTER;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Visual weight of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// One transient status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<StatusMessage>,
    generation: u64,
}

impl Slot {
    fn show(&mut self, message: StatusMessage) -> u64 {
        self.generation += 1;
        self.current = Some(message);
        self.generation
    }

    fn clear_if(&mut self, generation: u64) -> bool {
        if self.generation == generation {
            self.current = None;
            true
        } else {
            false
        }
    }
}

/// Shared handle to the transient status slot
#[derive(Clone, Default)]
pub struct StatusNotifier {
    slot: Arc<Mutex<Slot>>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an informational message that auto-clears
    pub async fn info(&self, text: impl Into<String>) {
        self.show(text.into(), Severity::Info).await;
    }

    /// Show an error message that auto-clears
    pub async fn error(&self, text: impl Into<String>) {
        self.show(text.into(), Severity::Error).await;
    }

    async fn show(&self, text: String, severity: Severity) {
        let generation = self.slot.lock().await.show(StatusMessage { text, severity });
        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            tokio::time::sleep(STATUS_CLEAR_AFTER).await;
            slot.lock().await.clear_if(generation);
        });
    }

    /// The message currently on display, if any
    pub async fn current(&self) -> Option<StatusMessage> {
        self.slot.lock().await.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    #[tokio::test(start_paused = true)]
    async fn test_message_auto_clears() {
        let status = StatusNotifier::new();
        status.info("Deposit successful!").await;
        assert_eq!(
            status.current().await.unwrap().text,
            "Deposit successful!"
        );

        // Let the spawned clear task register its sleep before advancing
        tokio::task::yield_now().await;
        advance(STATUS_CLEAR_AFTER + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert!(status.current().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_clear_newer_message() {
        let status = StatusNotifier::new();
        status.info("first").await;

        advance(STATUS_CLEAR_AFTER - Duration::from_millis(100)).await;
        status.error("second").await;

        // The first message's timer fires now; the second must survive
        advance(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        let current = status.current().await.unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.severity, Severity::Error);

        advance(STATUS_CLEAR_AFTER).await;
        tokio::task::yield_now().await;
        assert!(status.current().await.is_none());
    }
}
