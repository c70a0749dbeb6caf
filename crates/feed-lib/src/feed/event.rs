//! Inbound stream event envelope

use crate::models::MetricSnapshot;
use serde::Deserialize;

/// Events pushed by the stream server.
///
/// The server publishes JSON text frames shaped as
/// `{"event": "metrics", "data": {...}}`. Frames carrying an unknown event
/// or a malformed payload fail to decode; the worker counts and skips them
/// without tearing the connection down.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A metric snapshot pushed by the server
    Metrics(MetricSnapshot),
}

impl StreamEvent {
    /// Decode a single text frame
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_metrics_event() {
        let frame = r#"{"event":"metrics","data":{"timestamp":1700000000,"requests":1204,"latency":38.5,"errors":3,"successRate":99.7}}"#;

        let StreamEvent::Metrics(snapshot) = StreamEvent::decode(frame).unwrap();
        assert_eq!(snapshot.timestamp, 1_700_000_000);
        assert_eq!(snapshot.requests, 1204);
        assert_eq!(snapshot.errors, 3);
        assert!((snapshot.success_rate - 99.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_rejects_unknown_event() {
        let frame = r#"{"event":"heartbeat","data":{}}"#;
        assert!(StreamEvent::decode(frame).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        let frame = r#"{"event":"metrics","data":{"timestamp":"not-a-number"}}"#;
        assert!(StreamEvent::decode(frame).is_err());

        assert!(StreamEvent::decode("not json at all").is_err());
    }
}
