// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event payload variants

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EventFamily;

/// Payload for artifact events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactPayload {
    pub deployment_id: String,
    pub artifact: Map<String, Value>,
}

/// Payload for alarm events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlarmPayload {
    pub deployment_id: String,
    pub alarm: Map<String, Value>,
}

/// Tagged union of every payload an event can carry
///
/// The variant is identified on the wire by its body key (`artifact` or
/// `alarm`); the event type in the metadata names the same family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Artifact(ArtifactPayload),
    Alarm(AlarmPayload),
}

impl Payload {
    pub fn family(&self) -> EventFamily {
        match self {
            Payload::Artifact(_) => EventFamily::Artifact,
            Payload::Alarm(_) => EventFamily::Alarm,
        }
    }

    pub fn deployment_id(&self) -> &str {
        match self {
            Payload::Artifact(p) => &p.deployment_id,
            Payload::Alarm(p) => &p.deployment_id,
        }
    }
}

impl From<ArtifactPayload> for Payload {
    fn from(payload: ArtifactPayload) -> Self {
        Payload::Artifact(payload)
    }
}

impl From<AlarmPayload> for Payload {
    fn from(payload: AlarmPayload) -> Self {
        Payload::Alarm(payload)
    }
}
