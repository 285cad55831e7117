//! Control-plane operations consumed by the provisioning workflows
//!
//! Trait-based so the workflows can run against the HTTP client or an
//! in-memory fake.

use async_trait::async_trait;
use sluice_core::domain::pipeline::PipelineDescriptor;
use sluice_core::dto::pipeline::PipelineDefinition;

use crate::error::Result;

/// Pipeline operations exposed by the control plane
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Fetch a pipeline by name
    ///
    /// Fails with [`crate::ClientError::UnknownPipeline`] when no pipeline
    /// has this name.
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDescriptor>;

    /// Register a new pipeline; fails if the name is taken
    async fn create_pipeline(&self, definition: &PipelineDefinition) -> Result<PipelineDescriptor>;

    /// Create the pipeline if absent, overwrite its definition otherwise
    async fn create_or_update_pipeline(
        &self,
        definition: &PipelineDefinition,
    ) -> Result<PipelineDescriptor>;

    /// Start a pipeline
    async fn start_pipeline(&self, name: &str) -> Result<()>;

    /// Stop a pipeline
    ///
    /// With `force`, the pipeline is terminated without draining. Returns
    /// once the pipeline is stopped.
    async fn stop_pipeline(&self, name: &str, force: bool) -> Result<()>;

    /// Clear the pipeline's persisted storage
    ///
    /// The pipeline must be stopped. Returns once storage is cleared.
    async fn clear_storage(&self, name: &str) -> Result<()>;

    /// Delete a pipeline
    async fn delete_pipeline(&self, name: &str) -> Result<()>;
}
