//! Builder for constructing state transitions.

use crate::builder::error::DefinitionError;
use crate::core::{
    Actor, CallbackError, ExtraArgs, PermissionCheck, StateTransition, TransitionHandler,
};
use crate::validation::{ValidationError, ValidationRules};
use std::collections::HashSet;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Argument names taken by the handler's fixed parameters.
const RESERVED_ARGUMENTS: [&str; 2] = ["record", "actor"];

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<R> {
    pub(crate) name: String,
    from_state: Option<String>,
    from_states: Option<Vec<String>>,
    to: Option<String>,
    description: Option<String>,
    public: bool,
    permission: Option<PermissionCheck<R>>,
    validation: ValidationRules<R>,
    handler: Option<TransitionHandler<R>>,
    handler_args: Vec<String>,
}

impl<R> TransitionBuilder<R> {
    /// Create a new transition builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from_state: None,
            from_states: None,
            to: None,
            description: None,
            public: false,
            permission: None,
            validation: ValidationRules::new(),
            handler: None,
            handler_args: Vec::new(),
        }
    }

    /// Set the single source state.
    /// Use either this or `from_any`, not both.
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from_state = Some(state.into());
        self
    }

    /// Set several source states.
    pub fn from_any<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from_states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Set the description (required).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make the transition visible to end users.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Replace the default permission check (privileged actors only).
    pub fn permission<F>(mut self, check: F) -> Self
    where
        F: Fn(&R, &dyn Actor) -> bool + Send + Sync + 'static,
    {
        self.permission = Some(Arc::new(check));
        self
    }

    /// Add validation rules (optional).
    pub fn validate(mut self, rules: ValidationRules<R>) -> Self {
        self.validation = self.validation.extend(rules);
        self
    }

    /// Add a custom validation check.
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&R) -> Validation<(), NonEmptyVec<ValidationError>> + Send + Sync + 'static,
    {
        self.validation = self.validation.require(check);
        self
    }

    /// Add a predicate validation with an error message.
    pub fn require_pred<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.validation = self.validation.require_pred(predicate, message);
        self
    }

    /// Set the handler run during the transition, before the state changes.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut R, Option<&dyn Actor>, &ExtraArgs) -> Result<(), CallbackError>
            + Send
            + Sync
            + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Declare the extra arguments the handler accepts.
    pub fn handler_args<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handler_args = names.into_iter().map(Into::into).collect();
        self
    }
}

impl<R> TransitionBuilder<R> {
    pub(crate) fn set_handler(&mut self, handler: TransitionHandler<R>) {
        self.handler = Some(handler);
    }

    pub(crate) fn set_permission(&mut self, check: PermissionCheck<R>) {
        self.permission = Some(check);
    }

    pub(crate) fn add_validation(&mut self, rules: ValidationRules<R>) {
        let current = std::mem::take(&mut self.validation);
        self.validation = current.extend(rules);
    }

    /// Build the transition.
    ///
    /// State references and `to_state_description` are resolved by the
    /// machine builder, which knows the declared states.
    pub(crate) fn build(self, machine: &str) -> Result<StateTransition<R>, DefinitionError> {
        let from_states = match (self.from_state, self.from_states) {
            (Some(_), Some(_)) => {
                return Err(DefinitionError::AmbiguousFromStates {
                    machine: machine.to_string(),
                    transition: self.name,
                })
            }
            (Some(state), None) => vec![state],
            (None, Some(states)) if !states.is_empty() => {
                let mut seen = HashSet::new();
                states
                    .into_iter()
                    .filter(|state| seen.insert(state.clone()))
                    .collect()
            }
            _ => {
                return Err(DefinitionError::MissingFromStates {
                    machine: machine.to_string(),
                    transition: self.name,
                })
            }
        };

        let to_state = self.to.ok_or_else(|| DefinitionError::MissingToState {
            machine: machine.to_string(),
            transition: self.name.clone(),
        })?;

        let description =
            self.description
                .ok_or_else(|| DefinitionError::MissingTransitionDescription {
                    machine: machine.to_string(),
                    transition: self.name.clone(),
                })?;

        check_handler_args(machine, &self.name, &self.handler_args, self.handler.is_some())?;

        Ok(StateTransition {
            name: self.name,
            from_states,
            to_state,
            description,
            to_state_description: String::new(),
            is_public: self.public,
            permission: self.permission,
            validation: self.validation,
            handler: self.handler,
            handler_args: self.handler_args,
        })
    }
}

fn check_handler_args(
    machine: &str,
    transition: &str,
    args: &[String],
    has_handler: bool,
) -> Result<(), DefinitionError> {
    let invalid = |reason: String| DefinitionError::InvalidHandlerSignature {
        machine: machine.to_string(),
        owner: transition.to_string(),
        reason,
    };

    if !args.is_empty() && !has_handler {
        return Err(invalid(
            "extra arguments are declared but no handler is set".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for arg in args {
        if arg.is_empty() {
            return Err(invalid("argument names cannot be empty".to_string()));
        }
        if RESERVED_ARGUMENTS.contains(&arg.as_str()) {
            return Err(invalid(format!("argument name '{arg}' is reserved")));
        }
        if !seen.insert(arg.as_str()) {
            return Err(invalid(format!("argument '{arg}' is declared twice")));
        }
    }
    Ok(())
}
