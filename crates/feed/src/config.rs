//! Service configuration

use anyhow::Result;
use feed_lib::FeedConfig;
use serde::Deserialize;
use std::time::Duration;

/// Feed service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Instance name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// API server port for the read API and health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Metrics stream endpoint
    #[serde(default = "default_stream_endpoint")]
    pub stream_endpoint: String,

    /// Stream connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Initial reconnect backoff in seconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_secs: u64,

    /// Maximum reconnect backoff in seconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_stream_endpoint() -> String {
    "ws://localhost:9090/stream".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_initial_backoff() -> u64 {
    1
}

fn default_max_backoff() -> u64 {
    300
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PULSE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            stream_endpoint: default_stream_endpoint(),
            connect_timeout_secs: default_connect_timeout(),
            initial_backoff_secs: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }))
    }

    /// Feed connection settings derived from this configuration
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            endpoint: self.stream_endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            initial_backoff: Duration::from_secs(self.initial_backoff_secs),
            max_backoff: Duration::from_secs(self.max_backoff_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.api_port, 8080);
        assert_eq!(config.stream_endpoint, "ws://localhost:9090/stream");
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.initial_backoff_secs, 1);
        assert_eq!(config.max_backoff_secs, 300);
    }

    #[test]
    fn test_feed_config_conversion() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        let feed = config.feed_config();

        assert_eq!(feed.endpoint, config.stream_endpoint);
        assert_eq!(feed.connect_timeout, Duration::from_secs(10));
        assert_eq!(feed.initial_backoff, Duration::from_secs(1));
        assert_eq!(feed.max_backoff, Duration::from_secs(300));
    }
}
