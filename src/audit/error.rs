//! Audit log error types.

use thiserror::Error;

/// Errors raised by the audit log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditError {
    /// History was requested from a machine that does not log.
    #[error("State machine '{machine}' does not log state transitions. Please enable it by setting log_transitions to true")]
    LoggingDisabled { machine: String },

    /// The audit entry's own lifecycle does not allow this step.
    #[error("Audit transition '{transition}' cannot start in the state '{state}'")]
    InvalidAuditTransition { transition: String, state: String },

    /// The backing store failed.
    #[error("Audit store failure: {0}")]
    Store(String),
}
