// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pipeline Stage Machine
//!
//! One machine per lifecycle action:
//!
//! ```text
//! Building ──PayloadBuilt──> Publishing ──Delivered / DryRun──> Done
//!    │                           │
//!    └──PayloadRejected──> Failed <──DeliveryFailed──┘
//! ```
//!
//! `Done` and `Failed` are terminal.

use serde::Serialize;
use std::fmt;

use crate::state_machine::{StateMachine, TransitionError, TransitionResult};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Building,
    Publishing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Stage machine input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageInput {
    PayloadBuilt,
    PayloadRejected,
    Delivered,
    DryRun,
    DeliveryFailed,
}

impl StateMachine for Stage {
    type Input = StageInput;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use Stage::*;
        use StageInput::*;

        match (self, input) {
            (Building, PayloadBuilt) => Ok((Publishing, ())),
            (Building, PayloadRejected) => Ok((Failed, ())),
            (Publishing, Delivered) | (Publishing, DryRun) => Ok((Done, ())),
            (Publishing, DeliveryFailed) => Ok((Failed, ())),
            (Done, _) | (Failed, _) => Err(TransitionError::Terminal(self.to_string())),
            (from, input) => Err(TransitionError::InvalidTransition {
                from: from.to_string(),
                to: format!("{:?}", input),
            }),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}
