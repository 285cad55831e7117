//! Configuration module
//!
//! Handles CLI configuration: control-plane URL, credentials and timeouts.

use anyhow::{Context, Result};
use sluice_client::{ClientConfig, ControlPlaneClient};
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the control plane
    pub url: String,

    /// API key for the control plane, if it requires one
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    /// Client settings derived from this configuration
    ///
    /// Polling settings come from the environment; the request timeout and
    /// API key come from the command line.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::from_env()?.with_request_timeout(self.timeout);
        Ok(match &self.api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        })
    }

    /// Build a control-plane client
    pub fn client(&self) -> Result<ControlPlaneClient> {
        tracing::debug!(url = %self.url, "connecting to control plane");
        ControlPlaneClient::with_config(&self.url, self.client_config()?)
            .with_context(|| format!("Failed to create client for {}", self.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_carries_api_key_and_timeout() {
        let config = Config {
            url: "http://localhost:8080".to_string(),
            api_key: Some("secret".to_string()),
            timeout: Duration::from_secs(5),
        };

        let client_config = config.client_config().unwrap();
        assert_eq!(client_config.api_key.as_deref(), Some("secret"));
        assert_eq!(client_config.request_timeout, Duration::from_secs(5));

        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
