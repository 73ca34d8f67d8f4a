// Copyright (c) 2025 - Cowboy AI, Inc.

//! Provisioned resources that report lifecycle events
//!
//! Each resource turns its host-supplied state into a [`Payload`](crate::events::Payload)
//! through a builder implementing [`PayloadSource`](crate::pipeline::PayloadSource).

pub mod alarm;
pub mod artifact;

pub use alarm::{AlarmBuilder, AlarmResource, Metric};
pub use artifact::{ArtifactBuilder, ArtifactFiles, ArtifactResource};
