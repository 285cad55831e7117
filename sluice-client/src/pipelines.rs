//! Pipeline-related API endpoints

use async_trait::async_trait;
use reqwest::Method;
use sluice_core::domain::pipeline::PipelineDescriptor;
use sluice_core::dto::pipeline::PipelineDefinition;
use std::time::Duration;
use tokio::time::{Instant, sleep};

use crate::api::PipelineApi;
use crate::error::{ClientError, Result};
use crate::ControlPlaneClient;

impl ControlPlaneClient {
    // =============================================================================
    // Pipeline Query
    // =============================================================================

    /// List all pipelines
    ///
    /// # Returns
    /// A list of all pipelines
    pub async fn list_pipelines(&self) -> Result<Vec<PipelineDescriptor>> {
        let response = self.request(Method::GET, &["v0", "pipelines"])?.send().await?;

        self.handle_response(response).await
    }
}

/// Poll a pipeline until `done` holds for its descriptor
///
/// Fetches at least once, then every `poll_interval` until `wait_timeout`
/// has elapsed. Errors from the fetch end the wait.
///
/// # Arguments
/// * `api` - The control plane to poll
/// * `name` - The pipeline name
/// * `what` - Description of the awaited state, used in the timeout error
/// * `done` - Predicate over the latest descriptor
pub(crate) async fn wait_until<A, F>(
    api: &A,
    name: &str,
    what: &str,
    done: F,
    poll_interval: Duration,
    wait_timeout: Duration,
) -> Result<()>
where
    A: PipelineApi + ?Sized,
    F: Fn(&PipelineDescriptor) -> bool + Send,
{
    let deadline = Instant::now() + wait_timeout;

    loop {
        let descriptor = api.get_pipeline(name).await?;
        if done(&descriptor) {
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(ClientError::Timeout(format!(
                "pipeline {} did not reach {} within {:?}",
                name, what, wait_timeout
            )));
        }

        tracing::debug!(
            pipeline = name,
            deployment_status = %descriptor.deployment_status,
            "waiting for {}",
            what
        );
        sleep(poll_interval).await;
    }
}

#[async_trait]
impl PipelineApi for ControlPlaneClient {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDescriptor> {
        let response = self
            .request(Method::GET, &["v0", "pipelines", name])?
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_pipeline(&self, definition: &PipelineDefinition) -> Result<PipelineDescriptor> {
        let response = self
            .request(Method::POST, &["v0", "pipelines"])?
            .json(definition)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_or_update_pipeline(
        &self,
        definition: &PipelineDefinition,
    ) -> Result<PipelineDescriptor> {
        let response = self
            .request(Method::PUT, &["v0", "pipelines", definition.name()])?
            .json(definition)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn start_pipeline(&self, name: &str) -> Result<()> {
        let response = self
            .request(Method::POST, &["v0", "pipelines", name, "start"])?
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    async fn stop_pipeline(&self, name: &str, force: bool) -> Result<()> {
        let response = self
            .request(Method::POST, &["v0", "pipelines", name, "stop"])?
            .query(&[("force", force)])
            .send()
            .await?;

        self.handle_empty_response(response).await?;

        wait_until(
            self,
            name,
            "Stopped",
            |d| d.deployment_status.is_stopped(),
            self.poll_interval,
            self.wait_timeout,
        )
        .await
    }

    async fn clear_storage(&self, name: &str) -> Result<()> {
        let response = self
            .request(Method::POST, &["v0", "pipelines", name, "clear"])?
            .send()
            .await?;

        self.handle_empty_response(response).await?;

        wait_until(
            self,
            name,
            "cleared storage",
            |d| d.storage_status.is_cleared(),
            self.poll_interval,
            self.wait_timeout,
        )
        .await
    }

    async fn delete_pipeline(&self, name: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &["v0", "pipelines", name])?
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
