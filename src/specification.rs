// Copyright (c) 2025 - Cowboy AI, Inc.

//! Artifact type resolution
//!
//! The bundle specification declares each artifact field with a `$ref` naming
//! its artifact definition:
//!
//! ```yaml
//! artifacts:
//!   properties:
//!     database:
//!       $ref: massdriver/postgresql-authentication
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ProvisionerError, ProvisionerResult};

/// Resolves the declared type of an artifact field
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, field: &str) -> ProvisionerResult<String>;
}

#[derive(Debug, Default, Deserialize)]
struct BundleSpecification {
    #[serde(default)]
    artifacts: ArtifactSpecification,
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactSpecification {
    #[serde(default)]
    properties: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

/// Resolver reading the bundle specification YAML on every call
#[derive(Debug, Clone)]
pub struct SpecificationFile {
    path: PathBuf,
}

impl SpecificationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TypeResolver for SpecificationFile {
    fn resolve(&self, field: &str) -> ProvisionerResult<String> {
        let text = fs::read_to_string(&self.path).map_err(|_| {
            ProvisionerError::validation(format!(
                "Unable to open specification file: {}",
                self.path.display()
            ))
        })?;
        resolve_type(&text, field)
    }
}

/// Look up `artifacts.properties[field]["$ref"]` in a specification document
pub fn resolve_type(specification: &str, field: &str) -> ProvisionerResult<String> {
    let spec: BundleSpecification = serde_yaml::from_str(specification).map_err(|e| {
        ProvisionerError::validation(format!("specification is not valid YAML: {}", e))
    })?;

    let artifact = spec.artifacts.properties.get(field).ok_or_else(|| {
        ProvisionerError::validation(format!(
            "artifact validation failed: field \"{}\" does not exist in specification",
            field
        ))
    })?;

    artifact
        .get("$ref")
        .and_then(|r| r.as_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            ProvisionerError::validation(format!(
                "artifact validation failed: field \"{}\" does not contain a $ref",
                field
            ))
        })
}
