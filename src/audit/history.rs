//! Transition history queries.

use crate::audit::entry::AuditLogEntry;
use crate::audit::error::AuditError;
use crate::audit::store::AuditStore;
use crate::core::{LookupError, StateMachine, StateTransition};
use serde_json::{Map, Value};
use std::ops::Deref;

/// An audit entry read back together with the machine it belongs to.
pub struct AuditEntryView<'m, R> {
    machine: &'m StateMachine<R>,
    entry: AuditLogEntry,
}

impl<'m, R> AuditEntryView<'m, R> {
    pub fn new(machine: &'m StateMachine<R>, entry: AuditLogEntry) -> Self {
        Self { machine, entry }
    }

    pub fn entry(&self) -> &AuditLogEntry {
        &self.entry
    }

    pub fn into_entry(self) -> AuditLogEntry {
        self.entry
    }

    /// The transition this entry was recorded for, found by its state pair.
    pub fn transition(&self) -> Result<&'m StateTransition<R>, LookupError> {
        self.machine
            .get_transition_between(&self.entry.from_state, &self.entry.to_state)
    }

    pub fn from_state_description(&self) -> Result<&'m str, LookupError> {
        Ok(self.machine.get_state(&self.entry.from_state)?.description())
    }

    pub fn to_state_description(&self) -> Result<&'m str, LookupError> {
        Ok(self.machine.get_state(&self.entry.to_state)?.description())
    }

    pub fn transition_description(&self) -> Result<&'m str, LookupError> {
        Ok(self.transition()?.description())
    }

    /// Whether the originating transition is public; false when it no
    /// longer exists.
    pub fn is_public(&self) -> bool {
        self.transition().map(|t| t.is_public()).unwrap_or(false)
    }

    pub fn extra_args(&self) -> Map<String, Value> {
        self.entry.extra_args()
    }
}

impl<R> Deref for AuditEntryView<'_, R> {
    type Target = AuditLogEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl<R> std::fmt::Debug for AuditEntryView<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditEntryView")
            .field("machine", &self.machine.name())
            .field("entry", &self.entry)
            .finish()
    }
}

/// Every audit entry of `record_id`, oldest first.
///
/// Fails with [`AuditError::LoggingDisabled`] when the machine does not log.
pub fn list_transitions<'m, R>(
    machine: &'m StateMachine<R>,
    store: &dyn AuditStore,
    record_id: &str,
) -> Result<Vec<AuditEntryView<'m, R>>, AuditError> {
    if !machine.logs_transitions() {
        return Err(AuditError::LoggingDisabled {
            machine: machine.name().to_string(),
        });
    }

    Ok(store
        .entries_for(record_id)?
        .into_iter()
        .map(|entry| AuditEntryView::new(machine, entry))
        .collect())
}

/// Completed entries of public transitions, meant for end users.
///
/// Empty when the machine does not log; only store failures are errors.
pub fn list_public_completed_transitions<'m, R>(
    machine: &'m StateMachine<R>,
    store: &dyn AuditStore,
    record_id: &str,
) -> Result<Vec<AuditEntryView<'m, R>>, AuditError> {
    match list_transitions(machine, store, record_id) {
        Ok(views) => Ok(views
            .into_iter()
            .filter(|view| view.is_public() && view.completed())
            .collect()),
        Err(AuditError::LoggingDisabled { .. }) => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}
