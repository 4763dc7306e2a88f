//! Notification channels for run reports.
//!
//! Each channel implements the [`Messenger`] trait; the manager fans one
//! report out to every configured channel. Dispatch is best-effort, a
//! failing channel never fails the run.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::report::RunReport;

// ── Messenger trait ─────────────────────────────────────────────────────────

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Channel name used in logs.
    fn name(&self) -> &str;

    /// Channel type (telegram, wecom).
    fn messenger_type(&self) -> &str;

    /// Verify credentials or connectivity before the first send.
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Send a raw text message.
    async fn send_message(&self, content: &str) -> Result<String>;

    /// Send a run report, using the rendering this channel prefers.
    async fn send_report(&self, report: &RunReport) -> Result<String> {
        self.send_message(&report.render_text()).await
    }
}

// ── Messenger manager ───────────────────────────────────────────────────────

/// Holds the configured channels and dispatches to all of them.
pub struct MessengerManager {
    messengers: Vec<Box<dyn Messenger>>,
}

impl MessengerManager {
    pub fn new() -> Self {
        Self {
            messengers: Vec::new(),
        }
    }

    pub fn add_messenger(&mut self, messenger: Box<dyn Messenger>) {
        self.messengers.push(messenger);
    }

    pub fn is_empty(&self) -> bool {
        self.messengers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messengers.len()
    }

    /// Initialize every channel; the ones that fail are dropped with a
    /// warning instead of failing the run.
    pub async fn initialize_all(&mut self) {
        let mut ready = Vec::with_capacity(self.messengers.len());
        for mut messenger in self.messengers.drain(..) {
            match messenger.initialize().await {
                Ok(()) => ready.push(messenger),
                Err(e) => {
                    warn!(channel = messenger.name(), error = %e, "channel failed to initialize, skipping")
                }
            }
        }
        self.messengers = ready;
    }

    /// Dispatch `report` to every channel. Failures are logged, never
    /// fatal. Returns how many channels accepted the message.
    pub async fn dispatch_report(&self, report: &RunReport) -> usize {
        let mut delivered = 0;
        for messenger in &self.messengers {
            match messenger.send_report(report).await {
                Ok(id) => {
                    info!(channel = messenger.name(), message_id = %id, "notification sent");
                    delivered += 1;
                }
                Err(e) => {
                    warn!(channel = messenger.name(), error = %e, "notification failed");
                }
            }
        }
        delivered
    }
}

impl Default for MessengerManager {
    fn default() -> Self {
        Self::new()
    }
}

// ── Built-in messengers ─────────────────────────────────────────────────────

mod telegram;
mod wecom;

pub use telegram::TelegramMessenger;
pub use wecom::{WeComFormat, WeComMessenger};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FlakyMessenger {
        fail: bool,
        sends: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Messenger for FlakyMessenger {
        fn name(&self) -> &str {
            "flaky"
        }

        fn messenger_type(&self) -> &str {
            "test"
        }

        async fn send_message(&self, _content: &str) -> Result<String> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("send refused")
            }
            Ok("1".to_string())
        }
    }

    #[tokio::test]
    async fn dispatch_continues_past_failing_channels() {
        let sends = Arc::new(AtomicUsize::new(0));
        let mut manager = MessengerManager::new();
        manager.add_messenger(Box::new(FlakyMessenger {
            fail: true,
            sends: sends.clone(),
        }));
        manager.add_messenger(Box::new(FlakyMessenger {
            fail: false,
            sends: sends.clone(),
        }));

        let report = RunReport::new(Vec::new());
        let delivered = manager.dispatch_report(&report).await;

        assert_eq!(delivered, 1);
        assert_eq!(sends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_manager_delivers_nothing() {
        let manager = MessengerManager::new();
        let report = RunReport::new(Vec::new());
        assert_eq!(manager.dispatch_report(&report).await, 0);
    }
}
