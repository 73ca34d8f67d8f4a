// Copyright (c) 2025 - Cowboy AI, Inc.

//! Event transports
//!
//! A [`Transport`] delivers one serialized [`Event`] and reports what happened.
//! Two live implementations exist:
//!
//! - [`QueueTransport`]: ordered per deployment, deduplicated per publish
//! - [`HttpTransport`]: authenticated POST with a bounded timeout
//!
//! Both refuse to touch the network when their destination identifier is
//! blank and return [`Delivery::DryRun`] carrying the would-be event instead.

pub mod http;
pub mod nats;
pub mod queue;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::events::Event;

pub use http::{HttpConfig, HttpTransport};
pub use nats::{JetStreamQueueClient, NatsQueueConfig};
pub use queue::{QueueClient, QueueMessage, QueueTransport};

/// Non-error result of a publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The destination accepted the event
    Delivered,

    /// No destination configured; `detail` is the serialized event
    DryRun { detail: String },
}

/// Errors raised while delivering an event
#[derive(Debug, Error)]
pub enum TransportError {
    /// Event could not be encoded
    #[error("failed to encode event: {0}")]
    Serialization(String),

    /// Request never produced a response (connection refused, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Endpoint answered with status >= 400
    #[error("HTTP error: {status} - {body}")]
    Status { status: u16, body: String },

    /// Queue rejected the message or never acknowledged it
    #[error("queue publish failed: {0}")]
    Queue(String),

    /// Queue server unreachable
    #[error("queue connection failed: {0}")]
    Connection(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Serialization(err.to_string())
    }
}

/// Outcome of a single publish
pub type DeliveryOutcome = Result<Delivery, TransportError>;

/// Capability to deliver events to the control plane
///
/// Implementations hold only read-only configuration, so one instance can be
/// shared across concurrent lifecycle actions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `event` exactly once
    async fn publish(&self, event: &Event) -> DeliveryOutcome;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Build the dry-run outcome for `event`
pub(crate) fn dry_run(transport: &str, event: &Event) -> DeliveryOutcome {
    let detail = event.to_json()?;
    warn!(
        transport = transport,
        event_type = %event.event_type(),
        deployment_id = %event.deployment_id(),
        "No destination configured, event not sent"
    );
    Ok(Delivery::DryRun { detail })
}
