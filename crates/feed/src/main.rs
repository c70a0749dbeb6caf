//! Pulse Feed - real-time API metrics feed service
//!
//! Subscribes to the platform's metrics stream, maintains the sliding
//! window of recent snapshots, and serves the read API the dashboard
//! widgets consume.

use anyhow::Result;
use feed_lib::{
    health::{components, HealthRegistry},
    observability::{FeedMetrics, StructuredLogger},
    window::{MetricsWindow, SharedWindow},
    ConnectionTracker, RealTimeFeed,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting pulse-feed");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(
        instance = %config.instance_name,
        stream_endpoint = %config.stream_endpoint,
        "Service configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::FEED).await;
    health_registry.register(components::WINDOW).await;
    health_registry.register(components::API).await;

    // Initialize metrics
    let metrics = FeedMetrics::new();

    // Initialize structured logger
    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(SERVICE_VERSION, &config.stream_endpoint);

    // The window and its single writer are owned by this scope; the feed
    // is torn down on every exit path below.
    let window = MetricsWindow::new().into_shared();
    let mut feed = RealTimeFeed::start(config.feed_config(), window.clone(), metrics.clone())?;

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics.clone(),
        window.clone(),
        feed.tracker(),
    ));

    // Mark service as ready after initialization
    health_registry.set_ready(true).await;

    // Start the read API and health/metrics server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Reflect stream connectivity into component health
    let monitor_handle = tokio::spawn(monitor_feed_health(
        health_registry.clone(),
        feed.tracker(),
        window.clone(),
        logger.clone(),
    ));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");

    feed.stop().await;
    monitor_handle.abort();
    api_handle.abort();
    info!("Shutting down");

    Ok(())
}

/// Periodically mirror stream connectivity into the health registry and
/// log transitions
async fn monitor_feed_health(
    health: HealthRegistry,
    connection: ConnectionTracker,
    window: SharedWindow,
    logger: StructuredLogger,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(15));
    let mut was_connected = false;

    loop {
        ticker.tick().await;

        let connected = connection.is_connected().await;
        let samples = window.read().await.len();

        if connected != was_connected {
            logger.log_stream_status(connected, samples);
            was_connected = connected;
        }

        if connected {
            health.set_healthy(components::FEED).await;
        } else {
            health
                .set_degraded(components::FEED, "metrics stream disconnected, window is stale")
                .await;
        }
    }
}
