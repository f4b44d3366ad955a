//! Notification sinks.

mod broadcast;

pub use broadcast::BroadcastNotifier;
