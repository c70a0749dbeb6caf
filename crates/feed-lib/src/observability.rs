//! Observability infrastructure for the metrics feed
//!
//! Provides:
//! - Prometheus metrics (stream health, snapshot throughput, window occupancy)
//! - Structured JSON event logging with tracing

use prometheus::{register_histogram, register_int_gauge, Histogram, IntGauge};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for snapshot handling latency (in seconds)
const HANDLE_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.002_5, 0.005, 0.01, 0.025, 0.05,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<FeedMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct FeedMetricsInner {
    snapshots_received: IntGauge,
    frames_skipped: IntGauge,
    stream_reconnects: IntGauge,
    stream_connected: IntGauge,
    window_samples: IntGauge,
    snapshot_handle_seconds: Histogram,
}

impl FeedMetricsInner {
    fn new() -> Self {
        Self {
            snapshots_received: register_int_gauge!(
                "pulse_feed_snapshots_received_total",
                "Total number of metric snapshots recorded from the stream"
            )
            .expect("Failed to register snapshots_received"),

            frames_skipped: register_int_gauge!(
                "pulse_feed_frames_skipped_total",
                "Total number of stream frames skipped as undecodable"
            )
            .expect("Failed to register frames_skipped"),

            stream_reconnects: register_int_gauge!(
                "pulse_feed_stream_reconnects_total",
                "Total number of reconnection attempts to the metrics stream"
            )
            .expect("Failed to register stream_reconnects"),

            stream_connected: register_int_gauge!(
                "pulse_feed_stream_connected",
                "Whether the metrics stream is currently connected (1) or not (0)"
            )
            .expect("Failed to register stream_connected"),

            window_samples: register_int_gauge!(
                "pulse_feed_window_samples",
                "Number of snapshots currently held in the sliding window"
            )
            .expect("Failed to register window_samples"),

            snapshot_handle_seconds: register_histogram!(
                "pulse_feed_snapshot_handle_seconds",
                "Time spent recording a received snapshot into the window",
                HANDLE_BUCKETS.to_vec()
            )
            .expect("Failed to register snapshot_handle_seconds"),
        }
    }
}

/// Feed metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct FeedMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(FeedMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &FeedMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Count one recorded snapshot
    pub fn inc_snapshots_received(&self) {
        self.inner().snapshots_received.inc();
    }

    /// Count one skipped (undecodable) frame
    pub fn inc_frames_skipped(&self) {
        self.inner().frames_skipped.inc();
    }

    /// Count one reconnection attempt
    pub fn inc_stream_reconnects(&self) {
        self.inner().stream_reconnects.inc();
    }

    /// Update the stream connectivity gauge
    pub fn set_stream_connected(&self, connected: bool) {
        self.inner().stream_connected.set(i64::from(connected));
    }

    /// Update the window occupancy gauge
    pub fn set_window_samples(&self, samples: i64) {
        self.inner().window_samples.set(samples);
    }

    /// Record how long one snapshot took to land in the window
    pub fn observe_snapshot_handle(&self, duration_secs: f64) {
        self.inner().snapshot_handle_seconds.observe(duration_secs);
    }
}

/// Structured logger for feed lifecycle events
///
/// Provides consistent JSON-formatted logging for startup, shutdown, and
/// stream connectivity transitions.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, stream_endpoint: &str) {
        info!(
            event = "feed_started",
            instance = %self.instance,
            service_version = %version,
            stream_endpoint = %stream_endpoint,
            "Metrics feed service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "feed_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Metrics feed service shutting down"
        );
    }

    /// Log a stream connectivity transition
    pub fn log_stream_status(&self, connected: bool, window_samples: usize) {
        if connected {
            info!(
                event = "stream_status",
                instance = %self.instance,
                connected = true,
                window_samples = window_samples,
                "Metrics stream connected"
            );
        } else {
            warn!(
                event = "stream_status",
                instance = %self.instance,
                connected = false,
                window_samples = window_samples,
                "Metrics stream disconnected, serving stale window"
            );
        }
    }
}
