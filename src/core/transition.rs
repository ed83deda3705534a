//! Transition definitions.

use super::actor::Actor;
use super::args::ExtraArgs;
use super::error::CallbackError;
use crate::validation::{ValidationError, ValidationRules};
use std::fmt;
use std::sync::Arc;

/// Callback invoked while a transition executes, before the state changes.
pub type TransitionHandler<R> =
    Arc<dyn Fn(&mut R, Option<&dyn Actor>, &ExtraArgs) -> Result<(), CallbackError> + Send + Sync>;

/// Predicate deciding whether an actor may execute a transition on a record.
pub type PermissionCheck<R> = Arc<dyn Fn(&R, &dyn Actor) -> bool + Send + Sync>;

/// A named, guarded edge from one or more states into a single state.
///
/// Created by the builder once the machine is validated; immutable afterwards.
pub struct StateTransition<R> {
    pub(crate) name: String,
    pub(crate) from_states: Vec<String>,
    pub(crate) to_state: String,
    pub(crate) description: String,
    pub(crate) to_state_description: String,
    pub(crate) is_public: bool,
    pub(crate) permission: Option<PermissionCheck<R>>,
    pub(crate) validation: ValidationRules<R>,
    pub(crate) handler: Option<TransitionHandler<R>>,
    pub(crate) handler_args: Vec<String>,
}

impl<R> StateTransition<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source states, in declaration order.
    pub fn from_states(&self) -> &[String] {
        &self.from_states
    }

    pub fn to_state(&self) -> &str {
        &self.to_state
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Description of the destination state, copied when the machine was built.
    pub fn to_state_description(&self) -> &str {
        &self.to_state_description
    }

    /// Public transitions are meant to be seen by end users.
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Names of the extra arguments the handler accepts.
    pub fn handler_kwargs(&self) -> &[String] {
        &self.handler_args
    }

    pub fn accepts_argument(&self, name: &str) -> bool {
        self.handler_args.iter().any(|arg| arg == name)
    }

    /// Check whether the transition can start from `state` (pure).
    pub fn can_start_from(&self, state: &str) -> bool {
        self.from_states.iter().any(|from| from == state)
    }

    /// Check whether `actor` may run this transition on `record`.
    ///
    /// Without an explicit permission check only privileged actors pass.
    pub fn has_permission(&self, record: &R, actor: &dyn Actor) -> bool {
        match &self.permission {
            Some(check) => check(record, actor),
            None => actor.is_privileged(),
        }
    }

    /// All validation errors for `record`; empty when it may transition.
    pub fn validate(&self, record: &R) -> Vec<ValidationError> {
        self.validation.errors(record)
    }

    pub(crate) fn run_handler(
        &self,
        record: &mut R,
        actor: Option<&dyn Actor>,
        args: &ExtraArgs,
    ) -> Result<(), CallbackError> {
        match &self.handler {
            Some(handler) => handler(record, actor, args),
            None => Ok(()),
        }
    }
}

impl<R> fmt::Display for StateTransition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: (from {} to {})",
            self.description,
            self.from_states.join(" or "),
            self.to_state
        )
    }
}

impl<R> fmt::Debug for StateTransition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTransition")
            .field("name", &self.name)
            .field("from_states", &self.from_states)
            .field("to_state", &self.to_state)
            .field("description", &self.description)
            .field("is_public", &self.is_public)
            .field("handler_args", &self.handler_args)
            .finish_non_exhaustive()
    }
}
