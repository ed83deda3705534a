//! Errors raised while executing transitions.

use crate::audit::AuditError;
use crate::core::{CallbackError, LookupError};
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors that can occur while testing or executing a transition.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Unknown transition '{transition}' on machine '{machine}'")]
    UnknownTransition { machine: String, transition: String },

    #[error("State \"{state}\" does not exist in machine '{machine}'")]
    UnknownState { machine: String, state: String },

    #[error("Transition '{transition}' on machine '{machine}' cannot start in the state '{state}'")]
    CannotStart {
        machine: String,
        transition: String,
        state: String,
    },

    #[error("Permission for executing the transition '{transition}' has been denied to {actor}")]
    PermissionDenied { transition: String, actor: String },

    /// Carries every validation error, not only the first.
    #[error("Transition '{transition}' was not validated: {}", join_errors(.errors))]
    NotValidated {
        transition: String,
        errors: Vec<ValidationError>,
    },

    #[error("Transition '{transition}' does not accept the argument '{argument}'")]
    UnexpectedArgument { transition: String, argument: String },

    /// A transition or state handler failed.
    #[error(transparent)]
    Handler(CallbackError),

    /// Saving the record failed.
    #[error(transparent)]
    Persistence(CallbackError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TransitionError {
    /// Whether the attempt was refused by the guard.
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            Self::CannotStart { .. } | Self::PermissionDenied { .. } | Self::NotValidated { .. }
        )
    }

    /// Validation errors carried by a `NotValidated` failure.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::NotValidated { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<LookupError> for TransitionError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::UnknownState { machine, state } => Self::UnknownState { machine, state },
            LookupError::UnknownTransition {
                machine,
                transition,
            } => Self::UnknownTransition {
                machine,
                transition,
            },
            LookupError::TransitionNotFound { machine, from, to } => Self::UnknownTransition {
                machine,
                transition: format!("{from} -> {to}"),
            },
        }
    }
}
