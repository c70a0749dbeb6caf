//! Sliding window over metric snapshots
//!
//! Bounded FIFO history of the most recent snapshots plus the derived
//! period-over-period comparison the dashboard widgets consume. The window
//! lives in memory only; a restart starts it empty.

use crate::models::{percent_change, DeltaReport, MetricSnapshot};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Number of snapshots retained (one dashboard refresh cycle)
pub const WINDOW_CAPACITY: usize = 24;

/// Shared handle to the window.
///
/// The feed worker is the only writer; API handlers and other consumers
/// take read locks and use the read-only accessors.
pub type SharedWindow = Arc<RwLock<MetricsWindow>>;

/// Fixed-capacity FIFO history of metric snapshots, oldest first
#[derive(Debug)]
pub struct MetricsWindow {
    samples: VecDeque<MetricSnapshot>,
    capacity: usize,
}

impl MetricsWindow {
    /// Create an empty window with the standard capacity
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Create an empty window with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Wrap the window in the shared read/write handle
    pub fn into_shared(self) -> SharedWindow {
        Arc::new(RwLock::new(self))
    }

    /// Record a snapshot, evicting the oldest entry once at capacity.
    ///
    /// No field validation is performed; snapshots are stored in arrival
    /// order, duplicate or out-of-order timestamps included.
    pub fn record(&mut self, snapshot: MetricSnapshot) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(snapshot);
    }

    /// The most recently recorded snapshot
    pub fn latest(&self) -> Option<&MetricSnapshot> {
        self.samples.back()
    }

    /// The second-most-recent snapshot
    pub fn previous(&self) -> Option<&MetricSnapshot> {
        self.samples.len().checked_sub(2).and_then(|i| self.samples.get(i))
    }

    /// Comparison between the two most recent snapshots.
    ///
    /// `None` until two snapshots have been recorded. A per-field `None`
    /// inside the report means the previous value was zero.
    pub fn delta(&self) -> Option<DeltaReport> {
        let latest = self.latest()?;
        let previous = self.previous()?;

        Some(DeltaReport {
            requests: percent_change(previous.requests as f64, latest.requests as f64),
            latency: percent_change(previous.latency, latest.latency),
            errors: percent_change(previous.errors as f64, latest.errors as f64),
            success_rate: latest.success_rate - previous.success_rate,
        })
    }

    /// Number of snapshots currently retained
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no snapshot has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of snapshots retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained snapshots, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &MetricSnapshot> {
        self.samples.iter()
    }

    /// Occupancy statistics for the status surface
    pub fn stats(&self) -> WindowStats {
        WindowStats {
            samples: self.samples.len(),
            capacity: self.capacity,
            oldest_timestamp: self.samples.front().map(|s| s.timestamp),
            newest_timestamp: self.samples.back().map(|s| s.timestamp),
        }
    }
}

impl Default for MetricsWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Window occupancy statistics
#[derive(Debug, Clone, Serialize)]
pub struct WindowStats {
    /// Number of snapshots currently retained
    pub samples: usize,
    /// Maximum number of snapshots retained
    pub capacity: usize,
    /// Timestamp of the oldest retained snapshot
    pub oldest_timestamp: Option<i64>,
    /// Timestamp of the newest retained snapshot
    pub newest_timestamp: Option<i64>,
}
