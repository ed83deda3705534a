//! Lookup errors raised by the machine query surface.

use thiserror::Error;

/// Error returned by user-supplied callbacks (handlers, persistence).
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised when a name does not resolve against a machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("State \"{state}\" does not exist in machine '{machine}'")]
    UnknownState { machine: String, state: String },

    #[error("Unknown transition '{transition}' on machine '{machine}'")]
    UnknownTransition { machine: String, transition: String },

    #[error("Transition from '{from}' to '{to}' on machine '{machine}' not found")]
    TransitionNotFound {
        machine: String,
        from: String,
        to: String,
    },
}
