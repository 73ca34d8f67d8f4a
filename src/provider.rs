// Copyright (c) 2025 - Cowboy AI, Inc.

//! Provider entry point
//!
//! A [`Provider`] is configured once and then shared, read-only, by every
//! lifecycle action the host dispatches:
//!
//! ```rust,no_run
//! use provisioner_events::{AlarmResource, Operation, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::from_env()?;
//!
//!     let alarm = AlarmResource::new("arn:aws:cloudwatch:alarm/cpu", "High CPU");
//!     let response = provider.apply_alarm(Operation::Create, &alarm, None).await;
//!
//!     for diagnostic in &response.diagnostics {
//!         println!("{:?}: {}", diagnostic.severity, diagnostic.summary);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use tracing::{debug, error};

use crate::config::{EnvSettings, ProviderConfig};
use crate::errors::ProvisionerResult;
use crate::pipeline::{ApplyResponse, Operation, ProvisioningPipeline};
use crate::resources::{AlarmBuilder, AlarmResource, ArtifactBuilder, ArtifactFiles, ArtifactResource};
use crate::selector::select_transport;
use crate::transport::Transport;

/// Configured provider
#[derive(Clone)]
pub struct Provider {
    pipeline: ProvisioningPipeline,
    package_name: Option<String>,
}

impl Provider {
    /// Select a transport for `config`; fails when neither mode is complete
    pub fn configure(config: ProviderConfig) -> ProvisionerResult<Self> {
        let transport = select_transport(&config).map_err(|e| {
            error!("Unable to create Massdriver client: {}", e);
            e
        })?;
        Ok(Self::with_transport(transport, &config))
    }

    /// Configure from the process environment alone
    pub fn from_env() -> ProvisionerResult<Self> {
        Self::configure(ProviderConfig::default().with_env_defaults(&EnvSettings::from_env()))
    }

    /// Build around an existing transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ProviderConfig) -> Self {
        Self {
            pipeline: ProvisioningPipeline::new(
                transport,
                config.provisioner(),
                config.deployment(),
            ),
            package_name: config.package_name.clone(),
        }
    }

    pub fn pipeline(&self) -> &ProvisioningPipeline {
        &self.pipeline
    }

    /// Validate, build and publish an artifact lifecycle event
    pub async fn apply_artifact(
        &self,
        operation: Operation,
        resource: &ArtifactResource,
        resource_id: Option<&str>,
    ) -> ApplyResponse {
        let files = ArtifactFiles::for_resource(resource);
        let builder = ArtifactBuilder::new(resource, &files.schema, &files.specification);
        self.pipeline.apply(operation, &builder, resource_id).await
    }

    /// Build and publish an alarm lifecycle event
    ///
    /// Deleting an alarm that never received an id is a no-op.
    pub async fn apply_alarm(
        &self,
        operation: Operation,
        resource: &AlarmResource,
        resource_id: Option<&str>,
    ) -> ApplyResponse {
        let resource_id = resource_id.filter(|id| !id.is_empty());
        if operation == Operation::Delete && resource_id.is_none() {
            debug!(
                cloud_resource_id = %resource.cloud_resource_id,
                "Alarm has no id, nothing to delete"
            );
            return ApplyResponse::completed(operation, None, Vec::new(), chrono::Utc::now());
        }

        let builder = AlarmBuilder::new(resource, self.package_name.as_deref());
        self.pipeline.apply(operation, &builder, resource_id).await
    }
}
