//! Definition errors raised while building a machine.

use thiserror::Error;

/// Errors that can occur when building a state machine.
///
/// Every variant names the machine being built. Building is all or nothing:
/// no partial machine is ever returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Error in state machine definition '{machine}': machine does not define an initial state")]
    MissingInitialState { machine: String },

    #[error("Error in state machine definition '{machine}': multiple initial states ('{first}' and '{second}')")]
    MultipleInitialStates {
        machine: String,
        first: String,
        second: String,
    },

    #[error("Error in state machine definition '{machine}': abstract state '{state}' cannot be initial")]
    AbstractInitialState { machine: String, state: String },

    #[error("Error in state machine definition '{machine}': please use lowercase names for state definitions (instead of '{state}')")]
    InvalidStateName { machine: String, state: String },

    #[error("Error in state machine definition '{machine}': state '{state}' has no description")]
    MissingStateDescription { machine: String, state: String },

    #[error("Error in state machine definition '{machine}': state '{state}' is declared twice")]
    DuplicateState { machine: String, state: String },

    #[error("Error in state machine definition '{machine}': transition '{transition}' is declared twice")]
    DuplicateTransition { machine: String, transition: String },

    #[error("Error in state machine definition '{machine}': group '{group}' is declared twice")]
    DuplicateGroup { machine: String, group: String },

    #[error("Error in state machine definition '{machine}': transition '{transition}' uses both from_state and from_states")]
    AmbiguousFromStates { machine: String, transition: String },

    #[error("Error in state machine definition '{machine}': transition '{transition}' has no from_state")]
    MissingFromStates { machine: String, transition: String },

    #[error("Error in state machine definition '{machine}': transition '{transition}' has no to_state")]
    MissingToState { machine: String, transition: String },

    #[error("Error in state machine definition '{machine}': transition '{transition}' has no description")]
    MissingTransitionDescription { machine: String, transition: String },

    #[error("Error in state machine definition '{machine}': '{owner}' refers to unknown state '{state}'")]
    UnknownStateReference {
        machine: String,
        owner: String,
        state: String,
    },

    #[error("Error in state machine definition '{machine}': group '{group}' uses both states and exclude_states")]
    GroupPolicyConflict { machine: String, group: String },

    #[error("Error in state machine definition '{machine}': group '{group}' specifies neither states nor exclude_states")]
    MissingGroupPolicy { machine: String, group: String },

    #[error("Error in state machine definition '{machine}': group '{group}' must be given a list of states, not '{value}'")]
    GroupNotASet {
        machine: String,
        group: String,
        value: String,
    },

    #[error("Error in state machine definition '{machine}': group '{group}' lists no states")]
    EmptyGroup { machine: String, group: String },

    #[error("Error in state machine definition '{machine}': handler of '{owner}' is invalid: {reason}")]
    InvalidHandlerSignature {
        machine: String,
        owner: String,
        reason: String,
    },

    #[error("Error in state machine definition '{machine}': cannot attach callback to undeclared {kind} '{name}'")]
    UnknownHandlerTarget {
        machine: String,
        kind: &'static str,
        name: String,
    },

    #[error("Error in state machine declaration: {reason}")]
    Declaration { reason: String },
}
