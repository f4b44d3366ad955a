//! # Travel Tales Server
//!
//! Actix-web entry point exposing the feed, story pages and the author
//! dashboard over JSON.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use tales_core::ports::TokenVerifier;
use tales_infra::JwtTokenVerifier;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Travel Tales server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    telemetry::spawn_notification_logger(state.notifier.subscribe());

    // Warm the feed cache; failures are already logged and notified.
    if state.posts.list_all().await.is_ok() {
        tracing::info!(count = state.posts.posts().len(), "Feed cache warmed");
    }

    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtTokenVerifier::new(config.jwt.clone()));

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(verifier.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
