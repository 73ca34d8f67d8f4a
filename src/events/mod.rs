// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lifecycle Events
//!
//! An [`Event`] is the unit of delivery: a metadata header plus one payload
//! variant. Events are built fresh for every lifecycle action, never mutated,
//! serialized once and handed to a transport.
//!
//! # Wire Format
//!
//! ```text
//! {
//!   "metadata": {"timestamp": "...", "provisioner": "...", "event_type": "artifact_created"},
//!   "payload":  {"deployment_id": "...", "artifact": {...}}
//! }
//! ```
//!
//! # Type Safety
//!
//! The event type is derived from the payload family and the lifecycle
//! [`Action`], so an alarm payload can never travel under an artifact event
//! type. Deserialization re-checks the same pairing.

pub mod payload;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Provisioner;

pub use payload::{AlarmPayload, ArtifactPayload, Payload};

/// Lifecycle action that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

/// Payload family an event type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    Artifact,
    Alarm,
}

/// Closed set of event types understood by the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ArtifactCreated,
    ArtifactUpdated,
    ArtifactDeleted,
    AlarmCreated,
    AlarmUpdated,
    AlarmDeleted,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::ArtifactCreated,
        EventType::ArtifactUpdated,
        EventType::ArtifactDeleted,
        EventType::AlarmCreated,
        EventType::AlarmUpdated,
        EventType::AlarmDeleted,
    ];

    pub fn new(family: EventFamily, action: Action) -> Self {
        match (family, action) {
            (EventFamily::Artifact, Action::Created) => EventType::ArtifactCreated,
            (EventFamily::Artifact, Action::Updated) => EventType::ArtifactUpdated,
            (EventFamily::Artifact, Action::Deleted) => EventType::ArtifactDeleted,
            (EventFamily::Alarm, Action::Created) => EventType::AlarmCreated,
            (EventFamily::Alarm, Action::Updated) => EventType::AlarmUpdated,
            (EventFamily::Alarm, Action::Deleted) => EventType::AlarmDeleted,
        }
    }

    pub fn family(&self) -> EventFamily {
        match self {
            EventType::ArtifactCreated | EventType::ArtifactUpdated | EventType::ArtifactDeleted => {
                EventFamily::Artifact
            }
            EventType::AlarmCreated | EventType::AlarmUpdated | EventType::AlarmDeleted => {
                EventFamily::Alarm
            }
        }
    }

    pub fn action(&self) -> Action {
        match self {
            EventType::ArtifactCreated | EventType::AlarmCreated => Action::Created,
            EventType::ArtifactUpdated | EventType::AlarmUpdated => Action::Updated,
            EventType::ArtifactDeleted | EventType::AlarmDeleted => Action::Deleted,
        }
    }

    /// Wire name, e.g. `artifact_created`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ArtifactCreated => "artifact_created",
            EventType::ArtifactUpdated => "artifact_updated",
            EventType::ArtifactDeleted => "artifact_deleted",
            EventType::AlarmCreated => "alarm_created",
            EventType::AlarmUpdated => "alarm_updated",
            EventType::AlarmDeleted => "alarm_deleted",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// RFC 3339 creation time
    pub timestamp: String,
    pub provisioner: Provisioner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub event_type: EventType,
}

impl EventMetadata {
    /// Stamp a header for `event_type` with the current time
    ///
    /// Every field except `timestamp` is a pure function of the arguments.
    pub fn new(event_type: EventType, provisioner: &Provisioner) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            provisioner: provisioner.clone(),
            version: None,
            event_type,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A lifecycle event ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedEvent")]
pub struct Event {
    metadata: EventMetadata,
    payload: Payload,
}

impl Event {
    /// Build the event for `action` on `payload`
    pub fn new(action: Action, payload: Payload, provisioner: &Provisioner) -> Self {
        let event_type = EventType::new(payload.family(), action);
        Self {
            metadata: EventMetadata::new(event_type, provisioner),
            payload,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_version(version);
        self
    }

    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn event_type(&self) -> EventType {
        self.metadata.event_type
    }

    pub fn deployment_id(&self) -> &str {
        self.payload.deployment_id()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to JSON bytes
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[derive(Deserialize)]
struct UncheckedEvent {
    metadata: EventMetadata,
    payload: Payload,
}

impl TryFrom<UncheckedEvent> for Event {
    type Error = String;

    fn try_from(raw: UncheckedEvent) -> Result<Self, Self::Error> {
        if raw.metadata.event_type.family() != raw.payload.family() {
            return Err(format!(
                "event type {} does not match {:?} payload",
                raw.metadata.event_type,
                raw.payload.family()
            ));
        }
        Ok(Self {
            metadata: raw.metadata,
            payload: raw.payload,
        })
    }
}
