//! Core data models for the metrics feed

use serde::{Deserialize, Serialize};

/// One observation of platform-wide API traffic at a point in time.
///
/// Snapshots arrive over the stream transport and are never mutated after
/// construction. Wire casing is camelCase to match the dashboard payloads
/// this service feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    /// Unix timestamp (seconds) the snapshot was produced
    pub timestamp: i64,
    /// Requests observed in the sampling interval
    pub requests: u64,
    /// Observed latency for the interval, in milliseconds
    pub latency: f64,
    /// Errors observed in the sampling interval
    pub errors: u64,
    /// Success rate for the interval, in percent (0-100)
    pub success_rate: f64,
}

/// Period-over-period comparison between the two most recent snapshots.
///
/// Volume-like fields carry percentage change; `None` means the previous
/// value was zero and no comparison is available. `success_rate` is already
/// a percentage, so it carries the plain point difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaReport {
    pub requests: Option<f64>,
    pub latency: Option<f64>,
    pub errors: Option<f64>,
    pub success_rate: f64,
}

/// Percentage change from `previous` to `latest`.
///
/// Returns `None` when `previous` is zero; the quotient would be unbounded
/// and consumers render the field as "no comparison available" instead.
pub fn percent_change(previous: f64, latest: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((latest - previous) / previous * 100.0)
    }
}
