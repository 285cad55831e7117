//! Handle to a registered pipeline

use sluice_core::domain::pipeline::{DeploymentStatus, PipelineDescriptor, ProgramStatus};
use uuid::Uuid;

use crate::api::PipelineApi;
use crate::error::Result;

/// A pipeline registered on the control plane
///
/// Holds the descriptor returned by the last create, update or refresh and
/// the client used for lifecycle calls.
#[derive(Debug, Clone)]
pub struct Pipeline<C> {
    client: C,
    descriptor: PipelineDescriptor,
}

impl<C: PipelineApi> Pipeline<C> {
    pub(crate) fn new(client: C, descriptor: PipelineDescriptor) -> Self {
        Self { client, descriptor }
    }

    /// Fetch an existing pipeline by name
    pub async fn get(client: C, name: &str) -> Result<Self> {
        let descriptor = client.get_pipeline(name).await?;
        Ok(Self::new(client, descriptor))
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn id(&self) -> Uuid {
        self.descriptor.id
    }

    /// Descriptor as of the last call that returned one
    pub fn descriptor(&self) -> &PipelineDescriptor {
        &self.descriptor
    }

    pub fn into_descriptor(self) -> PipelineDescriptor {
        self.descriptor
    }

    pub fn deployment_status(&self) -> DeploymentStatus {
        self.descriptor.deployment_status
    }

    pub fn program_status(&self) -> &ProgramStatus {
        &self.descriptor.program_status
    }

    /// Re-fetch the descriptor from the control plane
    pub async fn refresh(&mut self) -> Result<&PipelineDescriptor> {
        self.descriptor = self.client.get_pipeline(&self.descriptor.name).await?;
        Ok(&self.descriptor)
    }

    pub async fn start(&self) -> Result<()> {
        self.client.start_pipeline(self.name()).await
    }

    /// Stop the pipeline; `force` skips the graceful drain
    pub async fn stop(&self, force: bool) -> Result<()> {
        self.client.stop_pipeline(self.name(), force).await
    }

    pub async fn clear_storage(&self) -> Result<()> {
        self.client.clear_storage(self.name()).await
    }

    /// Delete the pipeline, consuming the handle
    pub async fn delete(self) -> Result<()> {
        self.client.delete_pipeline(self.name()).await
    }
}
