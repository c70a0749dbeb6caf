//! WebSocket client for the snapshot stream
//!
//! This module provides the transport half of the feed:
//! - Endpoint validation up front
//! - Connects with a bounded timeout
//! - Tracks connection state and reconnection backoff

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

/// Transport stream carrying the feed connection
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Errors raised by the stream transport.
///
/// Consumers never see these; the worker folds them into the connectivity
/// flag and the last-error field of [`ConnectionStats`].
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid stream endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("connect to {endpoint} timed out after {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),
}

/// Configuration for the feed connection
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Stream endpoint URL (e.g. "ws://metrics-gateway:9090/stream")
    pub endpoint: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Initial backoff between reconnection attempts
    pub initial_backoff: Duration,
    /// Maximum backoff between reconnection attempts
    pub max_backoff: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:9090/stream".to_string(),
            connect_timeout: Duration::from_secs(10),
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Connection state for tracking reconnection attempts
#[derive(Debug, Clone)]
struct ConnectionState {
    connected: bool,
    last_error: Option<String>,
    reconnect_attempts: u32,
    current_backoff: Duration,
}

/// Point-in-time view of the connection, for the status surface
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStats {
    pub connected: bool,
    pub reconnect_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Shared connection-state handle.
///
/// The feed worker writes transitions; readers (status handlers, health
/// monitoring) only observe.
#[derive(Clone)]
pub struct ConnectionTracker {
    state: Arc<RwLock<ConnectionState>>,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl ConnectionTracker {
    pub fn new(initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectionState {
                connected: false,
                last_error: None,
                reconnect_attempts: 0,
                current_backoff: initial_backoff,
            })),
            initial_backoff,
            max_backoff,
        }
    }

    /// Record a successful handshake and reset backoff
    pub async fn mark_connected(&self) {
        let mut state = self.state.write().await;
        state.connected = true;
        state.last_error = None;
        state.reconnect_attempts = 0;
        state.current_backoff = self.initial_backoff;
    }

    /// Record a lost or failed connection.
    ///
    /// Advances the exponential backoff and returns the delay to wait
    /// before the next attempt.
    pub async fn mark_disconnected(&self, error: &str) -> Duration {
        let mut state = self.state.write().await;
        state.connected = false;
        state.last_error = Some(error.to_string());
        state.reconnect_attempts += 1;

        let next_backoff = std::cmp::min(state.current_backoff * 2, self.max_backoff);
        state.current_backoff = next_backoff;

        warn!(
            error = %error,
            attempts = state.reconnect_attempts,
            next_backoff_secs = next_backoff.as_secs(),
            "Metrics stream connection lost"
        );

        next_backoff
    }

    /// Whether the stream is currently connected
    pub async fn is_connected(&self) -> bool {
        self.state.read().await.connected
    }

    /// Current backoff delay for the next reconnection attempt
    pub async fn current_backoff(&self) -> Duration {
        self.state.read().await.current_backoff
    }

    /// Snapshot of the connection state
    pub async fn stats(&self) -> ConnectionStats {
        let state = self.state.read().await;
        ConnectionStats {
            connected: state.connected,
            reconnect_attempts: state.reconnect_attempts,
            last_error: state.last_error.clone(),
        }
    }
}

/// WebSocket client for the metrics stream
pub struct FeedClient {
    config: FeedConfig,
    tracker: ConnectionTracker,
}

impl FeedClient {
    /// Create a new client, validating the endpoint URL
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        validate_endpoint(&config.endpoint)?;
        let tracker = ConnectionTracker::new(config.initial_backoff, config.max_backoff);
        Ok(Self { config, tracker })
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Get a handle to the shared connection state
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Attempt the stream handshake once, within the connect timeout.
    ///
    /// Marks the tracker connected on success; the caller handles failure
    /// bookkeeping so it can schedule the next attempt.
    pub async fn connect(&self) -> Result<WsStream, FeedError> {
        let attempt = tokio::time::timeout(
            self.config.connect_timeout,
            connect_async(self.config.endpoint.as_str()),
        )
        .await;

        match attempt {
            Ok(Ok((stream, _response))) => {
                self.tracker.mark_connected().await;
                info!(endpoint = %self.config.endpoint, "Connected to metrics stream");
                Ok(stream)
            }
            Ok(Err(e)) => Err(FeedError::Transport(e)),
            Err(_) => Err(FeedError::ConnectTimeout {
                endpoint: self.config.endpoint.clone(),
                timeout: self.config.connect_timeout,
            }),
        }
    }
}

/// Reject endpoints the transport cannot speak to before the first attempt
fn validate_endpoint(endpoint: &str) -> Result<(), FeedError> {
    let url = url::Url::parse(endpoint).map_err(|e| FeedError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "ws" | "wss" => Ok(()),
        other => Err(FeedError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme \"{}\"", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_config_default() {
        let config = FeedConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.initial_backoff, Duration::from_secs(1));
        assert_eq!(config.max_backoff, Duration::from_secs(300));
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(FeedClient::new(FeedConfig {
            endpoint: "ws://localhost:9090/stream".to_string(),
            ..Default::default()
        })
        .is_ok());

        assert!(FeedClient::new(FeedConfig {
            endpoint: "wss://metrics.example.com/stream".to_string(),
            ..Default::default()
        })
        .is_ok());

        assert!(matches!(
            FeedClient::new(FeedConfig {
                endpoint: "http://localhost:9090/stream".to_string(),
                ..Default::default()
            }),
            Err(FeedError::InvalidEndpoint { .. })
        ));

        assert!(matches!(
            FeedClient::new(FeedConfig {
                endpoint: "not a url".to_string(),
                ..Default::default()
            }),
            Err(FeedError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_tracker_initial_state() {
        let tracker = ConnectionTracker::new(Duration::from_secs(1), Duration::from_secs(300));

        assert!(!tracker.is_connected().await);
        let stats = tracker.stats().await;
        assert_eq!(stats.reconnect_attempts, 0);
        assert!(stats.last_error.is_none());
    }

    #[tokio::test]
    async fn test_backoff_doubles_and_caps() {
        let tracker = ConnectionTracker::new(Duration::from_secs(1), Duration::from_secs(8));

        assert_eq!(
            tracker.mark_disconnected("refused").await,
            Duration::from_secs(2)
        );
        assert_eq!(
            tracker.mark_disconnected("refused").await,
            Duration::from_secs(4)
        );
        assert_eq!(
            tracker.mark_disconnected("refused").await,
            Duration::from_secs(8)
        );
        // Capped
        assert_eq!(
            tracker.mark_disconnected("refused").await,
            Duration::from_secs(8)
        );

        let stats = tracker.stats().await;
        assert_eq!(stats.reconnect_attempts, 4);
        assert_eq!(stats.last_error.as_deref(), Some("refused"));
    }

    #[tokio::test]
    async fn test_backoff_resets_on_connect() {
        let tracker = ConnectionTracker::new(Duration::from_secs(1), Duration::from_secs(300));

        tracker.mark_disconnected("refused").await;
        tracker.mark_disconnected("refused").await;
        assert_eq!(tracker.current_backoff().await, Duration::from_secs(4));

        tracker.mark_connected().await;
        assert!(tracker.is_connected().await);
        assert_eq!(tracker.current_backoff().await, Duration::from_secs(1));
        assert!(tracker.stats().await.last_error.is_none());
    }
}
