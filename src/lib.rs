//! Lifecycle event pipeline for provisioned resources
//!
//! Provisioned artifacts and alarms report every create, update and delete to
//! a remote control plane. This crate builds the typed event, picks a
//! transport once at configuration time, publishes exactly once per action and
//! turns the outcome into diagnostics for the lifecycle host.
//!
//! # Modules
//!
//! - [`events`] - event envelope and payload sum type
//! - [`transport`] - queue (JetStream) and HTTP transports
//! - [`selector`] - configuration → transport
//! - [`pipeline`] - build → publish → diagnostics
//! - [`resources`] - artifact and alarm payload builders
//! - [`provider`] - configured entry point for the host

pub mod config;
pub mod errors;
pub mod events;
pub mod pipeline;
pub mod provider;
pub mod resources;
pub mod selector;
pub mod specification;
pub mod state_machine;
pub mod transport;
pub mod validation;

// Re-export commonly used types
pub use config::{EnvSettings, ProviderConfig, Provisioner};
pub use errors::{ProvisionerError, ProvisionerResult};
pub use events::{Action, AlarmPayload, ArtifactPayload, Event, EventMetadata, EventType, Payload};
pub use pipeline::{ApplyResponse, Diagnostic, Operation, ProvisioningPipeline, Severity, Stage};
pub use provider::Provider;
pub use resources::{AlarmResource, ArtifactResource, Metric};
pub use selector::{select_mode, select_transport, TransportMode};
pub use transport::{Delivery, DeliveryOutcome, Transport, TransportError};
