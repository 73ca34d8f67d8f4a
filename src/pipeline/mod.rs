// Copyright (c) 2025 - Cowboy AI, Inc.

//! Provisioning Pipeline
//!
//! Turns one lifecycle action into one published event:
//!
//! ```text
//! resource state ──build──> Payload ──Event::new──> Event ──Transport──> outcome
//!                                                                          │
//!                                     ApplyResponse { diagnostics, id } <──┘
//! ```
//!
//! Each action performs a single publish attempt. The lifecycle host's own
//! re-apply cycle is the retry mechanism; nothing is retried here.
//!
//! # Outcomes
//!
//! | Outcome | Diagnostics | `resource_id` | `last_updated` |
//! |---|---|---|---|
//! | Delivered | none | create: timestamp placeholder, update: unchanged, delete: cleared | set (not on delete) |
//! | Dry run | one warning carrying the event | as delivered | as delivered |
//! | Build or transport failure | one error | unchanged | not set |

pub mod stage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::Provisioner;
use crate::errors::{ProvisionerError, ProvisionerResult};
use crate::events::{Action, Event, Payload};
use crate::state_machine::{StateMachine, StateMachineWithHistory};
use crate::transport::{Delivery, Transport};

pub use stage::{Stage, StageInput};

/// Summary of the warning emitted when no destination is configured
pub const DEV_OVERRIDE_SUMMARY: &str =
    "Development Override in effect. Resource will not be updated in Massdriver.";

/// Format of the `last_updated` attribute
const LAST_UPDATED_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S UTC";

/// Lifecycle operation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn action(&self) -> Action {
        match self {
            Operation::Create => Action::Created,
            Operation::Update => Action::Updated,
            Operation::Delete => Action::Deleted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic returned to the lifecycle host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// What a resource knows while its payload is being built
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub operation: Operation,
    pub deployment_id: &'a str,
    /// Identity recorded by the host, absent on create
    pub resource_id: Option<&'a str>,
}

/// Resource state that can be turned into an event payload
pub trait PayloadSource {
    fn build_payload(&self, ctx: &BuildContext<'_>) -> ProvisionerResult<Payload>;
}

/// Result handed back to the lifecycle host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyResponse {
    pub diagnostics: Vec<Diagnostic>,
    /// Identity the host should record; `None` clears it
    pub resource_id: Option<String>,
    pub last_updated: Option<String>,
    /// Terminal pipeline stage
    pub stage: Stage,
}

impl ApplyResponse {
    /// Completed response for `operation`, stamped at `now`
    pub fn completed(
        operation: Operation,
        resource_id: Option<&str>,
        diagnostics: Vec<Diagnostic>,
        now: DateTime<Utc>,
    ) -> Self {
        let (resource_id, last_updated) = match operation {
            Operation::Create => (Some(now.to_rfc3339()), Some(last_updated(now))),
            Operation::Update => (
                Some(resource_id.map(str::to_owned).unwrap_or_else(|| now.to_rfc3339())),
                Some(last_updated(now)),
            ),
            Operation::Delete => (None, None),
        };

        Self {
            diagnostics,
            resource_id,
            last_updated,
            stage: Stage::Done,
        }
    }

    fn failed(resource_id: Option<&str>, diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            resource_id: resource_id.map(str::to_owned),
            last_updated: None,
            stage: Stage::Failed,
        }
    }

    /// Whether the host may mark the action as applied
    pub fn is_applied(&self) -> bool {
        self.stage == Stage::Done
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

fn last_updated(now: DateTime<Utc>) -> String {
    now.format(LAST_UPDATED_FORMAT).to_string()
}

/// Event pipeline bound to one provider's transport
#[derive(Clone)]
pub struct ProvisioningPipeline {
    transport: Arc<dyn Transport>,
    provisioner: Provisioner,
    deployment_id: String,
}

impl ProvisioningPipeline {
    pub fn new(
        transport: Arc<dyn Transport>,
        provisioner: Provisioner,
        deployment_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            provisioner,
            deployment_id: deployment_id.into(),
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    /// Run one lifecycle action through build and publish
    pub async fn apply<S>(
        &self,
        operation: Operation,
        source: &S,
        resource_id: Option<&str>,
    ) -> ApplyResponse
    where
        S: PayloadSource + ?Sized,
    {
        let mut run = StateMachineWithHistory::new(Stage::Building);
        let ctx = BuildContext {
            operation,
            deployment_id: &self.deployment_id,
            resource_id,
        };

        let payload = match source.build_payload(&ctx) {
            Ok(payload) => payload,
            Err(err) => {
                advance(&mut run, StageInput::PayloadRejected);
                warn!(operation = ?operation, "Event not built: {}", err);
                return ApplyResponse::failed(resource_id, failure_diagnostic(&err));
            }
        };

        let event = Event::new(operation.action(), payload, &self.provisioner);
        advance(&mut run, StageInput::PayloadBuilt);

        debug!(
            transport = self.transport.name(),
            event_type = %event.event_type(),
            "Publishing lifecycle event"
        );

        let response = match self.transport.publish(&event).await {
            Ok(Delivery::Delivered) => {
                advance(&mut run, StageInput::Delivered);
                ApplyResponse::completed(operation, resource_id, Vec::new(), Utc::now())
            }
            Ok(Delivery::DryRun { detail }) => {
                advance(&mut run, StageInput::DryRun);
                ApplyResponse::completed(
                    operation,
                    resource_id,
                    vec![Diagnostic::warning(DEV_OVERRIDE_SUMMARY, detail)],
                    Utc::now(),
                )
            }
            Err(err) => {
                advance(&mut run, StageInput::DeliveryFailed);
                ApplyResponse::failed(resource_id, failure_diagnostic(&ProvisionerError::from(err)))
            }
        };

        debug!(
            path = ?run.path(),
            transitions = run.history().len(),
            "Lifecycle action finished"
        );
        response
    }
}

fn advance(run: &mut StateMachineWithHistory<Stage>, input: StageInput) {
    debug_assert!(
        run.current_state().can_transition(&input),
        "stage {} does not accept {:?}",
        run.current_state(),
        input
    );
    if let Err(e) = run.transition_with_history(input, Utc::now()) {
        error!("Pipeline stage error: {}", e);
    }
}

fn failure_diagnostic(err: &ProvisionerError) -> Diagnostic {
    let summary = match err {
        ProvisionerError::Transport(_) => "Unable to publish event",
        ProvisionerError::Configuration { .. } => "Unable to create Massdriver client",
        ProvisionerError::Validation(_) | ProvisionerError::Serialization(_) => {
            "Unable to build event"
        }
    };
    Diagnostic::error(summary, err.to_string())
}
