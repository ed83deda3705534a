//! A record paired with its executor.

use crate::audit::{AuditEntryView, AuditError};
use crate::core::{Actor, ExtraArgs, StateTransition};
use crate::effects::error::TransitionError;
use crate::effects::executor::{StateInfo, TransitionExecutor};
use crate::effects::record::StatefulRecord;

/// Per-record view of a machine, exposing every operation without
/// repeating the record.
///
/// Records embed no machine logic of their own; they borrow a handle from
/// the executor when they need one.
pub struct StateMachineHandle<'a, R> {
    executor: &'a TransitionExecutor<R>,
    record: &'a mut R,
}

impl<'a, R: StatefulRecord> StateMachineHandle<'a, R> {
    pub fn new(executor: &'a TransitionExecutor<R>, record: &'a mut R) -> Self {
        Self { executor, record }
    }

    pub fn record(&self) -> &R {
        self.record
    }

    /// Name of the current state.
    pub fn state(&self) -> &str {
        self.record.current_state()
    }

    pub fn state_info(&self) -> Result<StateInfo, TransitionError> {
        self.executor.state_info(self.record)
    }

    pub fn state_display(&self) -> Result<&str, TransitionError> {
        self.executor.state_display(self.record)
    }

    pub fn is_initial_state(&self) -> bool {
        self.executor.machine().initial_state().name() == self.state()
    }

    pub fn possible_transitions(&self) -> Vec<&StateTransition<R>> {
        self.executor.possible_transitions(self.record)
    }

    pub fn state_choices(&self) -> Vec<(String, String)> {
        self.executor.state_choices()
    }

    pub fn check_transition(
        &self,
        transition: &str,
        actor: Option<&dyn Actor>,
    ) -> Result<(), TransitionError> {
        self.executor.check_transition(self.record, transition, actor)
    }

    pub fn test_transition(&self, transition: &str, actor: Option<&dyn Actor>) -> bool {
        self.executor.test_transition(self.record, transition, actor)
    }

    pub fn make_transition(
        &mut self,
        transition: &str,
        actor: Option<&dyn Actor>,
        args: ExtraArgs,
    ) -> Result<(), TransitionError> {
        self.executor
            .make_transition(self.record, transition, actor, args)
    }

    pub fn list_transitions(&self) -> Result<Vec<AuditEntryView<'a, R>>, AuditError> {
        self.executor.list_transitions(self.record)
    }

    pub fn public_transitions(&self) -> Result<Vec<AuditEntryView<'a, R>>, AuditError> {
        self.executor.public_transitions(self.record)
    }
}
