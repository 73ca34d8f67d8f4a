// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic, pure state machine types. Transitions are deterministic functions
//! with no side effects:
//!
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! The provisioning pipeline drives one of these per lifecycle action and keeps
//! the transition history for diagnostics.

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state to target state is not allowed
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Current state accepts no further input
    #[error("State {0} is terminal")]
    Terminal(String),
}

/// Trait for finite state machines
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Whether no input can leave this state
    fn is_terminal(&self) -> bool;
}

/// Transition record
#[derive(Debug, Clone)]
pub struct Transition<S, I> {
    pub from: S,
    pub to: S,
    pub input: I,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// State machine with history
#[derive(Debug, Clone)]
pub struct StateMachineWithHistory<FSM: StateMachine> {
    current: FSM,
    history: Vec<Transition<FSM, FSM::Input>>,
}

impl<FSM: StateMachine> StateMachineWithHistory<FSM> {
    pub fn new(initial: FSM) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Transition with history recording
    pub fn transition_with_history(
        &mut self,
        input: FSM::Input,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> TransitionResult<FSM::Output> {
        let (to, output) = self.current.transition(&input)?;

        self.history.push(Transition {
            from: self.current.clone(),
            to: to.clone(),
            input,
            timestamp,
        });

        self.current = to;
        Ok(output)
    }

    pub fn history(&self) -> &[Transition<FSM, FSM::Input>] {
        &self.history
    }

    pub fn current_state(&self) -> &FSM {
        &self.current
    }

    /// States visited so far, starting with the initial one
    pub fn path(&self) -> Vec<FSM> {
        let mut path = Vec::with_capacity(self.history.len() + 1);
        match self.history.first() {
            Some(first) => path.push(first.from.clone()),
            None => path.push(self.current.clone()),
        }
        path.extend(self.history.iter().map(|t| t.to.clone()));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Switch {
        Off,
        On,
        Broken,
    }

    #[derive(Debug, Clone)]
    enum SwitchInput {
        Press,
        Smash,
    }

    impl StateMachine for Switch {
        type Input = SwitchInput;
        type Output = ();

        fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
            match (self, input) {
                (Switch::Broken, _) => Err(TransitionError::Terminal("Broken".to_string())),
                (_, SwitchInput::Smash) => Ok((Switch::Broken, ())),
                (Switch::Off, SwitchInput::Press) => Ok((Switch::On, ())),
                (Switch::On, SwitchInput::Press) => Ok((Switch::Off, ())),
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Switch::Broken)
        }
    }

    #[test]
    fn test_history_records_path() {
        let mut fsm = StateMachineWithHistory::new(Switch::Off);
        fsm.transition_with_history(SwitchInput::Press, Utc::now()).unwrap();
        fsm.transition_with_history(SwitchInput::Smash, Utc::now()).unwrap();

        assert_eq!(fsm.path(), vec![Switch::Off, Switch::On, Switch::Broken]);
        assert_eq!(fsm.history().len(), 2);
        assert!(fsm.current_state().is_terminal());
    }

    #[test]
    fn test_rejected_transition_leaves_state_untouched() {
        let mut fsm = StateMachineWithHistory::new(Switch::Broken);
        let result = fsm.transition_with_history(SwitchInput::Press, Utc::now());

        assert!(matches!(result, Err(TransitionError::Terminal(_))));
        assert_eq!(*fsm.current_state(), Switch::Broken);
        assert_eq!(fsm.path(), vec![Switch::Broken]);
        assert!(!Switch::Broken.can_transition(&SwitchInput::Press));
    }
}
