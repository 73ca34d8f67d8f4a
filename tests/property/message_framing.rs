// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Queue Message Framing
//!
//! For any deployment and payload:
//! - every framing of an event gets a distinct deduplication id
//! - the group id is always the deployment id
//! - the framed message decodes back to the same event

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;

use provisioner_events::transport::{QueueClient, QueueMessage, QueueTransport};
use provisioner_events::{
    Action, AlarmPayload, ArtifactPayload, Event, Payload, Provisioner, TransportError,
};

struct NullQueue;

#[async_trait::async_trait]
impl QueueClient for NullQueue {
    async fn send(&self, _message: QueueMessage) -> Result<(), TransportError> {
        Ok(())
    }
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Created),
        Just(Action::Updated),
        Just(Action::Deleted),
    ]
}

fn body_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,24}", 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

fn payload_strategy(deployment_id: String) -> impl Strategy<Value = Payload> {
    let artifact_deployment = deployment_id.clone();
    prop_oneof![
        body_strategy().prop_map(move |artifact| Payload::Artifact(ArtifactPayload {
            deployment_id: artifact_deployment.clone(),
            artifact,
        })),
        body_strategy().prop_map(move |alarm| Payload::Alarm(AlarmPayload {
            deployment_id: deployment_id.clone(),
            alarm,
        })),
    ]
}

fn event_strategy() -> impl Strategy<Value = (String, Event)> {
    "[a-z0-9-]{1,24}".prop_flat_map(|deployment_id| {
        (
            Just(deployment_id.clone()),
            action_strategy(),
            payload_strategy(deployment_id),
        )
            .prop_map(|(deployment_id, action, payload)| {
                (
                    deployment_id,
                    Event::new(action, payload, &Provisioner::new("terraform")),
                )
            })
    })
}

proptest! {
    #[test]
    fn prop_deduplication_ids_never_repeat((deployment_id, event) in event_strategy()) {
        let transport = QueueTransport::new(Arc::new(NullQueue), deployment_id.clone(), "events");

        let first = transport.message_for(&event).unwrap();
        let second = transport.message_for(&event).unwrap();

        prop_assert_ne!(first.deduplication_id, second.deduplication_id);
        prop_assert_eq!(&first.group_id, &deployment_id);
        prop_assert_eq!(first.group_id, second.group_id);
        prop_assert_eq!(first.message, second.message);
    }

    #[test]
    fn prop_framed_message_decodes_to_event((deployment_id, event) in event_strategy()) {
        let transport = QueueTransport::new(Arc::new(NullQueue), deployment_id, "events");

        let framed = transport.message_for(&event).unwrap();
        let decoded: Event = serde_json::from_str(&framed.message).unwrap();

        prop_assert_eq!(decoded.event_type(), event.event_type());
        prop_assert_eq!(decoded, event);
    }
}
