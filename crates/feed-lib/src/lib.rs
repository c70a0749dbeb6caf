//! Core library for the real-time API metrics feed
//!
//! This crate provides:
//! - Metric snapshot and delta models
//! - The fixed-capacity sliding window with derived comparisons
//! - The WebSocket feed client and background worker
//! - Health checks and observability

pub mod feed;
pub mod health;
pub mod models;
pub mod observability;
pub mod window;

pub use feed::{ConnectionStats, ConnectionTracker, FeedConfig, FeedError, RealTimeFeed};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::{percent_change, DeltaReport, MetricSnapshot};
pub use observability::{FeedMetrics, StructuredLogger};
pub use window::{MetricsWindow, SharedWindow, WindowStats, WINDOW_CAPACITY};
