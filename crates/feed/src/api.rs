//! HTTP API for health checks, Prometheus metrics, and the metrics read surface

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use feed_lib::{
    health::HealthRegistry, window::SharedWindow, ConnectionTracker, DeltaReport, FeedMetrics,
    MetricSnapshot, WindowStats,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: FeedMetrics,
    pub window: SharedWindow,
    pub connection: ConnectionTracker,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: FeedMetrics,
        window: SharedWindow,
        connection: ConnectionTracker,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            window,
            connection,
        }
    }
}

/// Latest snapshot plus the connectivity flag consumers use to mark
/// stale data
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub connected: bool,
    pub snapshot: Option<MetricSnapshot>,
}

/// Period-over-period delta; null until two snapshots have been recorded
#[derive(Debug, Serialize)]
pub struct DeltaResponse {
    pub delta: Option<DeltaReport>,
}

/// Retained snapshot history, oldest first
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub samples: Vec<MetricSnapshot>,
    pub capacity: usize,
}

/// Connection and window status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub connected: bool,
    pub reconnect_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub window: WindowStats,
    pub generated_at: i64,
}

/// Health check response - returns 200 while operational, 503 otherwise
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = if health.status.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Most recent snapshot.
///
/// Keeps serving the last recorded snapshot while disconnected; the
/// `connected` flag tells consumers to render it as stale.
async fn latest(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.window.read().await.latest().cloned();
    let connected = state.connection.is_connected().await;

    Json(LatestResponse { connected, snapshot })
}

/// Delta between the two most recent snapshots
async fn delta(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let delta = state.window.read().await.delta();
    Json(DeltaResponse { delta })
}

/// Retained snapshot history
async fn history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let window = state.window.read().await;
    Json(HistoryResponse {
        samples: window.samples().cloned().collect(),
        capacity: window.capacity(),
    })
}

/// Connection and window status
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.connection.stats().await;
    let window = state.window.read().await.stats();

    Json(StatusResponse {
        connected: stats.connected,
        reconnect_attempts: stats.reconnect_attempts,
        last_error: stats.last_error,
        window,
        generated_at: chrono::Utc::now().timestamp(),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/metrics/latest", get(latest))
        .route("/api/v1/metrics/delta", get(delta))
        .route("/api/v1/metrics/history", get(history))
        .route("/api/v1/status", get(status))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
