//! Real-time metrics feed
//!
//! Maintains the single subscription to the platform's snapshot stream:
//! - WebSocket client with connection-state tracking and backoff
//! - Event envelope decoding
//! - Background worker draining snapshots into the metrics window

mod client;
mod event;
mod worker;


pub use client::{ConnectionStats, ConnectionTracker, FeedClient, FeedConfig, FeedError};
pub use event::StreamEvent;
pub use worker::RealTimeFeed;
