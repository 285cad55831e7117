//! Sluice HTTP Client
//!
//! A type-safe client for provisioning pipelines on the control plane.
//!
//! The crate has three layers:
//! - [`PipelineApi`]: the control-plane operations, implemented over HTTP by
//!   [`ControlPlaneClient`]
//! - [`PipelineBuilder`]: the `create` and `create_or_replace` workflows
//! - [`Pipeline`]: a handle to a registered pipeline
//!
//! # Example
//!
//! ```no_run
//! use sluice_client::{ControlPlaneClient, PipelineBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ControlPlaneClient::new("http://localhost:8080");
//!
//!     let pipeline = PipelineBuilder::new(client)
//!         .name("orders")
//!         .sql("CREATE TABLE orders (id INT);")
//!         .create_or_replace()
//!         .await?;
//!
//!     println!("Registered pipeline: {}", pipeline.name());
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
pub mod config;
pub mod error;
#[cfg(test)]
mod fake;
mod pipeline;
mod pipelines;

// Re-export commonly used types
pub use api::PipelineApi;
pub use builder::PipelineBuilder;
pub use config::ClientConfig;
pub use error::{ClientError, ProvisionError, Result};
pub use pipeline::Pipeline;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the control-plane API
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    /// Base URL of the control plane (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token attached to every request
    api_key: Option<String>,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl ControlPlaneClient {
    /// Create a new client with the default configuration
    ///
    /// # Example
    /// ```
    /// use sluice_client::ControlPlaneClient;
    ///
    /// let client = ControlPlaneClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use sluice_client::ControlPlaneClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ControlPlaneClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let defaults = ClientConfig::default();
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key: None,
            poll_interval: defaults.poll_interval,
            wait_timeout: defaults.wait_timeout,
        }
    }

    /// Create a new client from a [`ClientConfig`]
    pub fn with_config(base_url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key: config.api_key,
            poll_interval: config.poll_interval,
            wait_timeout: config.wait_timeout,
        })
    }

    /// Get the base URL of the control plane
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request against the given path segments, attaching the API key
    /// if one is set
    ///
    /// Each segment is percent-encoded, so a pipeline name containing `/`, `?`
    /// or `#` stays a single segment.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let invalid = |reason: String| ClientError::InvalidUrl(format!("{}: {}", self.base_url, reason));

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        tracing::debug!(%method, %url, "control plane request");

        let builder = self.client.request(method, url);
        Ok(match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        })
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_response(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_response(status.as_u16(), &error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ControlPlaneClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ControlPlaneClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_config() {
        let config = ClientConfig::default().with_api_key("secret");
        let client = ControlPlaneClient::with_config("https://cloud.example.com/", config).unwrap();
        assert_eq!(client.base_url(), "https://cloud.example.com");
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_request_attaches_bearer_token() {
        let config = ClientConfig::default().with_api_key("secret");
        let client = ControlPlaneClient::with_config("http://localhost:8080", config).unwrap();

        let request = client
            .request(Method::GET, &["v0", "pipelines"])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:8080/v0/pipelines");
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn test_request_encodes_pipeline_name() {
        let client = ControlPlaneClient::new("http://localhost:8080/api/");

        let request = client
            .request(Method::GET, &["v0", "pipelines", "a/b?c#d"])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/v0/pipelines/a%2Fb%3Fc%23d"
        );
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_request_rejects_invalid_base_url() {
        let client = ControlPlaneClient::new("not a url");
        let err = client.request(Method::GET, &["v0", "pipelines"]).unwrap_err();

        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
