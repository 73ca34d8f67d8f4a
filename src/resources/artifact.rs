// Copyright (c) 2025 - Cowboy AI, Inc.

//! Artifact resource
//!
//! An artifact describes the connectable interface of a provisioned resource.
//! Before it is published the document is validated against the schema for its
//! field, and its type is looked up in the bundle specification.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::debug;

use crate::errors::{ProvisionerError, ProvisionerResult};
use crate::events::{ArtifactPayload, Payload};
use crate::pipeline::{BuildContext, Operation, PayloadSource};
use crate::specification::{SpecificationFile, TypeResolver};
use crate::validation::{SchemaFile, SchemaValidator};

pub const DEFAULT_ARTIFACT_SCHEMA_PATH: &str = "../schema-artifacts.json";
pub const DEFAULT_SPECIFICATION_PATH: &str = "../massdriver.yaml";

/// Artifact resource state as supplied by the host
#[derive(Clone, Deserialize)]
pub struct ArtifactResource {
    /// Artifact name in the bundle specification
    pub field: String,
    /// Human readable name
    pub name: String,
    /// JSON text of the artifact
    pub artifact: String,
    #[serde(default)]
    pub schema_path: Option<PathBuf>,
    #[serde(default)]
    pub specification_path: Option<PathBuf>,
    /// Deprecated, ignored
    #[serde(default)]
    pub provider_resource_id: Option<String>,
    /// Deprecated, ignored; the type comes from the specification
    #[serde(default, rename = "type")]
    pub declared_type: Option<String>,
}

impl ArtifactResource {
    pub fn new(
        field: impl Into<String>,
        name: impl Into<String>,
        artifact: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            name: name.into(),
            artifact: artifact.into(),
            schema_path: None,
            specification_path: None,
            provider_resource_id: None,
            declared_type: None,
        }
    }

    pub fn with_schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    pub fn with_specification_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.specification_path = Some(path.into());
        self
    }

    pub fn schema_path(&self) -> PathBuf {
        non_empty_path(&self.schema_path, DEFAULT_ARTIFACT_SCHEMA_PATH)
    }

    pub fn specification_path(&self) -> PathBuf {
        non_empty_path(&self.specification_path, DEFAULT_SPECIFICATION_PATH)
    }
}

// The artifact body is sensitive and stays out of logs.
impl std::fmt::Debug for ArtifactResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactResource")
            .field("field", &self.field)
            .field("name", &self.name)
            .field("artifact", &"<sensitive>")
            .field("schema_path", &self.schema_path)
            .field("specification_path", &self.specification_path)
            .finish()
    }
}

fn non_empty_path(path: &Option<PathBuf>, default: &str) -> PathBuf {
    match path {
        Some(p) if !p.as_os_str().is_empty() => p.clone(),
        _ => PathBuf::from(default),
    }
}

/// Builds artifact payloads with pluggable validation and type lookup
pub struct ArtifactBuilder<'a> {
    resource: &'a ArtifactResource,
    validator: &'a dyn SchemaValidator,
    resolver: &'a dyn TypeResolver,
}

impl<'a> ArtifactBuilder<'a> {
    pub fn new(
        resource: &'a ArtifactResource,
        validator: &'a dyn SchemaValidator,
        resolver: &'a dyn TypeResolver,
    ) -> Self {
        Self {
            resource,
            validator,
            resolver,
        }
    }

    fn metadata(&self, artifact_type: Option<String>) -> Value {
        let mut metadata = json!({
            "field": self.resource.field,
            "name": self.resource.name,
        });
        if let Some(t) = artifact_type {
            metadata["type"] = Value::String(t);
        }
        metadata
    }
}

impl PayloadSource for ArtifactBuilder<'_> {
    fn build_payload(&self, ctx: &BuildContext<'_>) -> ProvisionerResult<Payload> {
        if self.resource.declared_type.is_some() || self.resource.provider_resource_id.is_some() {
            debug!(field = %self.resource.field, "Ignoring deprecated artifact attributes");
        }

        let artifact = match ctx.operation {
            Operation::Delete => {
                let mut artifact = Map::new();
                if let Some(id) = ctx.resource_id {
                    artifact.insert("id".to_string(), Value::String(id.to_string()));
                }
                artifact.insert("metadata".to_string(), self.metadata(None));
                artifact
            }
            Operation::Create | Operation::Update => {
                let document: Value = serde_json::from_str(&self.resource.artifact)?;

                self.validator.validate(&self.resource.field, &document)?;
                let artifact_type = self.resolver.resolve(&self.resource.field)?;

                let Value::Object(mut artifact) = document else {
                    return Err(ProvisionerError::validation("artifact must be a JSON object"));
                };
                artifact.insert("metadata".to_string(), self.metadata(Some(artifact_type)));
                artifact
            }
        };

        Ok(Payload::Artifact(ArtifactPayload {
            deployment_id: ctx.deployment_id.to_string(),
            artifact,
        }))
    }
}

/// File-backed collaborators for an artifact resource
pub struct ArtifactFiles {
    pub schema: SchemaFile,
    pub specification: SpecificationFile,
}

impl ArtifactFiles {
    pub fn for_resource(resource: &ArtifactResource) -> Self {
        Self {
            schema: SchemaFile::new(resource.schema_path()),
            specification: SpecificationFile::new(resource.specification_path()),
        }
    }
}
