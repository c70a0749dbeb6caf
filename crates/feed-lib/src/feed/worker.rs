//! Background worker draining the stream into the metrics window

use super::client::{ConnectionStats, ConnectionTracker, FeedClient, FeedConfig, FeedError, WsStream};
use super::event::StreamEvent;
use crate::models::MetricSnapshot;
use crate::observability::FeedMetrics;
use crate::window::SharedWindow;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};

/// Handle to the single stream subscription.
///
/// Owns the background worker for its lifetime. The worker is the only
/// writer to the window; everything else reads. `stop` is idempotent,
/// safe even if the stream never connected, and guarantees no snapshot
/// is recorded after it returns.
pub struct RealTimeFeed {
    window: SharedWindow,
    tracker: ConnectionTracker,
    shutdown: broadcast::Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl RealTimeFeed {
    /// Open the subscription and start draining snapshots into `window`
    pub fn start(
        config: FeedConfig,
        window: SharedWindow,
        metrics: FeedMetrics,
    ) -> Result<Self, FeedError> {
        let client = FeedClient::new(config)?;
        let tracker = client.tracker();
        let (shutdown, shutdown_rx) = broadcast::channel(1);

        let worker = FeedWorker {
            client,
            tracker: tracker.clone(),
            window: window.clone(),
            metrics,
        };
        let handle = tokio::spawn(worker.run(shutdown_rx));

        Ok(Self {
            window,
            tracker,
            shutdown,
            worker: Some(handle),
        })
    }

    /// Whether the stream is currently connected
    pub async fn is_connected(&self) -> bool {
        self.tracker.is_connected().await
    }

    /// Connection statistics for the status surface
    pub async fn connection_stats(&self) -> ConnectionStats {
        self.tracker.stats().await
    }

    /// Handle to the shared connection state
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Most recently recorded snapshot, if any.
    ///
    /// Keeps returning the last recorded snapshot while disconnected;
    /// consumers treat it as potentially stale via the connectivity flag.
    pub async fn latest(&self) -> Option<MetricSnapshot> {
        self.window.read().await.latest().cloned()
    }

    /// Stop the worker and release the connection.
    ///
    /// Awaits worker teardown, so once this returns no further snapshot
    /// is recorded. Subsequent calls are no-ops.
    pub async fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        let _ = self.shutdown.send(());
        if handle.await.is_err() {
            debug!("Feed worker ended abnormally during shutdown");
        }
    }
}

/// How a pump pass over an open connection ended
enum PumpExit {
    Shutdown,
    Disconnected(String),
}

struct FeedWorker {
    client: FeedClient,
    tracker: ConnectionTracker,
    window: SharedWindow,
    metrics: FeedMetrics,
}

impl FeedWorker {
    /// Connect-pump-reconnect loop, until shutdown
    async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(endpoint = %self.client.endpoint(), "Starting metrics feed worker");

        loop {
            let connected = tokio::select! {
                result = self.client.connect() => result,
                _ = shutdown.recv() => break,
            };

            match connected {
                Ok(stream) => {
                    self.metrics.set_stream_connected(true);

                    let exit = self.pump(stream, &mut shutdown).await;
                    self.metrics.set_stream_connected(false);

                    match exit {
                        PumpExit::Shutdown => break,
                        PumpExit::Disconnected(reason) => {
                            let backoff = self.tracker.mark_disconnected(&reason).await;
                            self.metrics.inc_stream_reconnects();
                            if wait_or_shutdown(backoff, &mut shutdown).await {
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    let backoff = self.tracker.mark_disconnected(&e.to_string()).await;
                    self.metrics.inc_stream_reconnects();
                    if wait_or_shutdown(backoff, &mut shutdown).await {
                        break;
                    }
                }
            }
        }

        info!("Metrics feed worker stopped");
    }

    /// Drain one open connection until it drops or shutdown is requested
    async fn pump(&self, mut stream: WsStream, shutdown: &mut broadcast::Receiver<()>) -> PumpExit {
        loop {
            let message = tokio::select! {
                message = stream.next() => message,
                _ = shutdown.recv() => return PumpExit::Shutdown,
            };

            match message {
                Some(Ok(Message::Text(frame))) => self.handle_frame(&frame).await,
                Some(Ok(Message::Close(_))) => {
                    return PumpExit::Disconnected("server closed the stream".to_string());
                }
                // Binary frames carry no snapshots; ping/pong is handled
                // by the transport.
                Some(Ok(_)) => {}
                Some(Err(e)) => return PumpExit::Disconnected(e.to_string()),
                None => return PumpExit::Disconnected("stream ended".to_string()),
            }
        }
    }

    /// Record one decoded snapshot; skip anything undecodable.
    ///
    /// Recording happens synchronously before the next frame is read, so
    /// snapshots land in the window in delivery order.
    async fn handle_frame(&self, frame: &str) {
        let started = Instant::now();

        match StreamEvent::decode(frame) {
            Ok(StreamEvent::Metrics(snapshot)) => {
                let mut window = self.window.write().await;
                window.record(snapshot);
                let samples = window.len();
                drop(window);

                self.metrics.inc_snapshots_received();
                self.metrics.set_window_samples(samples as i64);
                self.metrics
                    .observe_snapshot_handle(started.elapsed().as_secs_f64());
            }
            Err(e) => {
                self.metrics.inc_frames_skipped();
                debug!(error = %e, "Skipping undecodable stream frame");
            }
        }
    }
}

/// Sleep out the backoff unless shutdown arrives first; true means stop
async fn wait_or_shutdown(delay: Duration, shutdown: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = shutdown.recv() => true,
    }
}
