//! Client configuration
//!
//! Connection settings and the timings used when waiting for the control
//! plane to finish an accepted request.

use anyhow::Context;
use std::time::Duration;

/// Configuration for [`crate::ControlPlaneClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token
    pub api_key: Option<String>,

    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,

    /// How often to poll a pipeline while waiting for a state change
    pub poll_interval: Duration,

    /// How long to wait for a stop or clear to complete
    pub wait_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            wait_timeout: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl ClientConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SLUICE_API_KEY (optional)
    /// - SLUICE_REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - SLUICE_POLL_INTERVAL (optional, milliseconds, default: 1000)
    /// - SLUICE_WAIT_TIMEOUT (optional, seconds, default: 300)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let api_key = std::env::var("SLUICE_API_KEY").ok().filter(|k| !k.is_empty());

        let request_timeout = env_u64("SLUICE_REQUEST_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let poll_interval = env_u64("SLUICE_POLL_INTERVAL")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let wait_timeout = env_u64("SLUICE_WAIT_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.wait_timeout);

        Ok(Self {
            api_key,
            request_timeout,
            poll_interval,
            wait_timeout,
        })
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn env_u64(key: &str) -> anyhow::Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, value)),
        Err(_) => Ok(None),
    }
}
