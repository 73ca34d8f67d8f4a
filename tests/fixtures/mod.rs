// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for provisioner-events
//!
//! Deterministic resource state, payloads and on-disk bundle files shared by
//! the integration suites. Only the event timestamp is left to the clock.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use provisioner_events::transport::{QueueClient, QueueMessage};
use provisioner_events::{
    AlarmPayload, AlarmResource, ArtifactPayload, ArtifactResource, Payload, Provisioner,
    TransportError,
};

pub const DEPLOYMENT_ID: &str = "d-1";
pub const PROVISIONER: &str = "terraform";
pub const ARTIFACT_FIELD: &str = "database";
pub const ARTIFACT_TYPE: &str = "massdriver/postgresql-authentication";

pub const ARTIFACT_SCHEMA: &str = r#"{
  "properties": {
    "database": {
      "type": "object",
      "required": ["data"],
      "properties": {
        "data": {
          "type": "object",
          "required": ["host"],
          "properties": {"host": {"type": "string"}}
        }
      }
    }
  }
}"#;

pub const BUNDLE_SPECIFICATION: &str = r#"
schema: draft-07
name: aws-rds
artifacts:
  properties:
    database:
      $ref: massdriver/postgresql-authentication
"#;

pub fn provisioner() -> Provisioner {
    Provisioner::new(PROVISIONER)
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

pub fn artifact_payload() -> Payload {
    Payload::Artifact(ArtifactPayload {
        deployment_id: DEPLOYMENT_ID.to_string(),
        artifact: object(json!({"data": {"host": "db.internal"}})),
    })
}

pub fn alarm_payload() -> Payload {
    Payload::Alarm(AlarmPayload {
        deployment_id: DEPLOYMENT_ID.to_string(),
        alarm: object(json!({"cloud_resource_id": "arn:aws:cloudwatch:alarm/cpu"})),
    })
}

pub fn alarm_resource() -> AlarmResource {
    AlarmResource {
        package_id: Some("pkg-1".to_string()),
        threshold: Some(80.0),
        ..AlarmResource::new("arn:aws:cloudwatch:alarm/cpu", "High CPU")
    }
}

/// Schema and specification written to a temporary bundle directory
pub struct BundleFiles {
    dir: TempDir,
}

impl BundleFiles {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("schema-artifacts.json"), ARTIFACT_SCHEMA)
            .expect("Failed to write schema");
        fs::write(dir.path().join("massdriver.yaml"), BUNDLE_SPECIFICATION)
            .expect("Failed to write specification");
        Self { dir }
    }

    pub fn schema_path(&self) -> PathBuf {
        self.dir.path().join("schema-artifacts.json")
    }

    pub fn specification_path(&self) -> PathBuf {
        self.dir.path().join("massdriver.yaml")
    }

    pub fn artifact(&self, document: Value) -> ArtifactResource {
        ArtifactResource::new(ARTIFACT_FIELD, "Primary DB", document.to_string())
            .with_schema_path(self.schema_path())
            .with_specification_path(self.specification_path())
    }
}

/// Queue backend that remembers every message it is handed
#[derive(Default)]
pub struct RecordingQueue {
    pub sent: Mutex<Vec<QueueMessage>>,
}

impl RecordingQueue {
    pub fn messages(&self) -> Vec<QueueMessage> {
        self.sent.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn send(&self, message: QueueMessage) -> Result<(), TransportError> {
        self.sent.lock().expect("poisoned").push(message);
        Ok(())
    }
}

/// Queue backend that fails every send
#[derive(Default)]
pub struct UnreachableQueue {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl QueueClient for UnreachableQueue {
    async fn send(&self, _message: QueueMessage) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Connection("connection refused".to_string()))
    }
}
