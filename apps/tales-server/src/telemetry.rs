//! Telemetry initialization and the notification log drain.

use tokio::sync::broadcast;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tales_core::ports::Notification;

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Enable JSON logging (for production).
    pub json_logs: bool,
    /// Service name attached to the startup event.
    pub service_name: String,
}

impl TelemetryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "tales-server".to_string()),
        }
    }
}

/// Initialize the tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tales_server=debug,tales_infra=debug"));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
}

/// Log every user-facing notification the repository emits.
pub fn spawn_notification_logger(mut receiver: broadcast::Receiver<Notification>) {
    actix_web::rt::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(n) if n.is_error() => {
                    tracing::warn!(title = %n.title, description = %n.description, "Notification")
                }
                Ok(n) => {
                    tracing::info!(title = %n.title, description = %n.description, "Notification")
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::warn!(lagged = count, "Notification logger lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
