// Copyright (c) 2025 - Cowboy AI, Inc.

//! Queue transport
//!
//! Wraps each event in a [`QueueMessage`] carrying:
//!
//! - a fresh deduplication id (UUID v4) per publish, never reused
//! - a group id equal to the deployment id, scoping FIFO order to one deployment
//!
//! The actual send goes through a [`QueueClient`], so the queue backend can be
//! swapped (JetStream in production, recording doubles in tests).

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{dry_run, Delivery, DeliveryOutcome, Transport, TransportError};
use crate::events::Event;

/// One message handed to the queue backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueMessage {
    /// Serialized event
    pub message: String,
    pub deduplication_id: String,
    pub group_id: String,
    pub destination: String,
}

/// Backend that performs the actual queue send
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn send(&self, message: QueueMessage) -> Result<(), TransportError>;
}

/// Ordered, deduplicated transport
pub struct QueueTransport {
    client: Arc<dyn QueueClient>,
    deployment_id: String,
    destination: String,
}

impl QueueTransport {
    pub fn new(
        client: Arc<dyn QueueClient>,
        deployment_id: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            client,
            deployment_id: deployment_id.into(),
            destination: destination.into(),
        }
    }

    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Whether a send would be attempted
    pub fn is_live(&self) -> bool {
        !self.destination.trim().is_empty()
    }

    /// Wrap `event` for sending; every call yields a new deduplication id
    pub fn message_for(&self, event: &Event) -> Result<QueueMessage, TransportError> {
        Ok(QueueMessage {
            message: event.to_json()?,
            deduplication_id: Uuid::new_v4().to_string(),
            group_id: self.deployment_id.clone(),
            destination: self.destination.clone(),
        })
    }
}

#[async_trait]
impl Transport for QueueTransport {
    async fn publish(&self, event: &Event) -> DeliveryOutcome {
        if !self.is_live() {
            return dry_run(self.name(), event);
        }

        let message = self.message_for(event)?;
        let deduplication_id = message.deduplication_id.clone();

        debug!(
            destination = %self.destination,
            group_id = %self.deployment_id,
            deduplication_id = %deduplication_id,
            event_type = %event.event_type(),
            "Publishing event to queue"
        );

        if let Err(e) = self.client.send(message).await {
            error!(
                destination = %self.destination,
                deduplication_id = %deduplication_id,
                "Queue publish failed: {}", e
            );
            return Err(e);
        }

        info!(
            group_id = %self.deployment_id,
            deduplication_id = %deduplication_id,
            event_type = %event.event_type(),
            "Event published"
        );
        Ok(Delivery::Delivered)
    }

    fn name(&self) -> &str {
        "queue"
    }
}
