// Copyright (c) 2025 - Cowboy AI, Inc.

//! Structural validation of artifact documents
//!
//! The schema file holds one JSON Schema per artifact field under
//! `properties`; only the schema named by the artifact's field is applied.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{ProvisionerError, ProvisionerResult};

/// Validates a document against the schema registered for a field
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, field: &str, document: &Value) -> ProvisionerResult<()>;
}

/// Validator reading the artifact schema file on every call
#[derive(Debug, Clone)]
pub struct SchemaFile {
    path: PathBuf,
}

impl SchemaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaValidator for SchemaFile {
    fn validate(&self, field: &str, document: &Value) -> ProvisionerResult<()> {
        let bytes = fs::read(&self.path).map_err(|_| {
            ProvisionerError::validation(format!(
                "Unable to open schema file: {}",
                self.path.display()
            ))
        })?;
        let schemas: Value = serde_json::from_slice(&bytes).map_err(|e| {
            ProvisionerError::validation(format!(
                "schema file {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })?;

        validate_field(&schemas, field, document)
    }
}

/// Apply `schemas.properties[field]` to `document`, reporting the first violation
pub fn validate_field(schemas: &Value, field: &str, document: &Value) -> ProvisionerResult<()> {
    let schema = schemas
        .get("properties")
        .and_then(|p| p.get(field))
        .ok_or_else(|| {
            ProvisionerError::validation(format!(
                "artifact validation failed: field \"{}\" does not exist in schema",
                field
            ))
        })?;

    let validator = jsonschema::validator_for(schema).map_err(|e| {
        ProvisionerError::validation(format!("invalid schema for field \"{}\": {}", field, e))
    })?;

    if let Some(first) = validator.iter_errors(document).next() {
        return Err(ProvisionerError::validation(format!(
            "artifact validation failed: {}: {}",
            first.instance_path, first
        )));
    }

    debug!(field = field, "Artifact passed schema validation");
    Ok(())
}
