// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Model Tests
//!
//! Tests verify:
//! - Every action maps to exactly one event type per payload family
//! - Event construction is deterministic apart from the timestamp
//! - Wire field names stay stable
//! - Mismatched event type and payload are rejected on decode

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

use provisioner_events::events::EventFamily;
use provisioner_events::{Action, Event, EventType, Payload};

#[test_case(Action::Created, artifact_payload(), EventType::ArtifactCreated, "artifact_created"; "artifact created")]
#[test_case(Action::Updated, artifact_payload(), EventType::ArtifactUpdated, "artifact_updated"; "artifact updated")]
#[test_case(Action::Deleted, artifact_payload(), EventType::ArtifactDeleted, "artifact_deleted"; "artifact deleted")]
#[test_case(Action::Created, alarm_payload(), EventType::AlarmCreated, "alarm_created"; "alarm created")]
#[test_case(Action::Updated, alarm_payload(), EventType::AlarmUpdated, "alarm_updated"; "alarm updated")]
#[test_case(Action::Deleted, alarm_payload(), EventType::AlarmDeleted, "alarm_deleted"; "alarm deleted")]
fn test_event_type_for_action(action: Action, payload: Payload, expected: EventType, wire: &str) {
    let event = Event::new(action, payload, &provisioner());

    assert_eq!(event.event_type(), expected);
    assert_eq!(event.event_type().to_string(), wire);

    let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    assert_eq!(value["metadata"]["event_type"], wire);
}

#[test]
fn test_event_is_deterministic_except_timestamp() {
    let first = Event::new(Action::Created, artifact_payload(), &provisioner());
    let second = Event::new(Action::Created, artifact_payload(), &provisioner());

    assert_eq!(first.payload(), second.payload());
    assert_eq!(first.metadata().provisioner, second.metadata().provisioner);
    assert_eq!(first.metadata().event_type, second.metadata().event_type);
    assert_eq!(first.metadata().version, second.metadata().version);
}

#[test]
fn test_timestamp_is_rfc3339() {
    let event = Event::new(Action::Updated, alarm_payload(), &provisioner());
    assert!(chrono::DateTime::parse_from_rfc3339(&event.metadata().timestamp).is_ok());
}

#[test]
fn test_wire_shape() {
    let event = Event::new(Action::Created, artifact_payload(), &provisioner());
    let mut value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    value["metadata"]
        .as_object_mut()
        .unwrap()
        .remove("timestamp");

    assert_eq!(
        value,
        json!({
            "metadata": {
                "provisioner": "terraform",
                "event_type": "artifact_created"
            },
            "payload": {
                "deployment_id": "d-1",
                "artifact": {"data": {"host": "db.internal"}}
            }
        })
    );
}

#[test]
fn test_version_is_carried_when_set() {
    let event = Event::new(Action::Created, alarm_payload(), &provisioner()).with_version("1.4.0");
    let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    assert_eq!(value["metadata"]["version"], "1.4.0");
}

#[test]
fn test_decode_restores_event() {
    let event = Event::new(Action::Deleted, alarm_payload(), &provisioner());
    let decoded: Event = serde_json::from_slice(&event.to_vec().unwrap()).unwrap();

    assert_eq!(decoded, event);
    assert_eq!(decoded.payload().family(), EventFamily::Alarm);
}

#[test]
fn test_decode_rejects_mismatched_family() {
    let wire = json!({
        "metadata": {
            "timestamp": "2026-01-19T12:00:00+00:00",
            "provisioner": "terraform",
            "event_type": "artifact_created"
        },
        "payload": {"deployment_id": "d-1", "alarm": {}}
    });

    let err = serde_json::from_value::<Event>(wire).unwrap_err();
    assert!(err.to_string().contains("does not match"));
}

#[test]
fn test_decode_rejects_unknown_event_type() {
    let wire = json!({
        "metadata": {
            "timestamp": "2026-01-19T12:00:00+00:00",
            "provisioner": "terraform",
            "event_type": "artifact_renamed"
        },
        "payload": {"deployment_id": "d-1", "artifact": {}}
    });

    assert!(serde_json::from_value::<Event>(wire).is_err());
}
