//! In-memory notification channel.
//!
//! Works within a single process only. Subscribers that fall behind lose
//! the oldest notifications.

use tokio::sync::broadcast;

use tales_core::ports::{Notification, Notifier};

/// Fans notifications out to every subscriber.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("NOTIFY_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(64),
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        // Ignore send errors (no subscribers)
        if self.sender.send(notification).is_err() {
            tracing::debug!("No subscribers for notification");
        }
    }
}
