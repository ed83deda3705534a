//! Builder for constructing state machines.

use crate::builder::error::DefinitionError;
use crate::builder::group::GroupBuilder;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::config::MachineConfig;
use crate::core::{
    Actor, CallbackError, ExtraArgs, StateDefinition, StateGroup, StateMachine, StateTransition,
};
use crate::validation::ValidationRules;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builder for constructing state machines with a fluent API.
///
/// Declarations are collected as-is and validated together by
/// [`build`](Self::build), which either returns a complete machine or the
/// first definition error found.
///
/// # Example
///
/// ```rust
/// use stately::builder::{GroupBuilder, MachineBuilder, StateBuilder, TransitionBuilder};
///
/// struct Order;
///
/// let machine = MachineBuilder::<Order>::new("order")
///     .state(StateBuilder::new("new").description("New order").initial())
///     .state(StateBuilder::new("paid").description("Paid"))
///     .state(StateBuilder::new("cancelled").description("Cancelled"))
///     .transition(
///         TransitionBuilder::new("pay")
///             .from("new")
///             .to("paid")
///             .description("Pay order")
///             .public(),
///     )
///     .transition(
///         TransitionBuilder::new("cancel")
///             .from_any(["new", "paid"])
///             .to("cancelled")
///             .description("Cancel order"),
///     )
///     .group(GroupBuilder::new("open").exclude_states(["cancelled"]))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.initial_state().name(), "new");
/// assert!(machine.group_membership("paid").get("open"));
/// ```
pub struct MachineBuilder<R> {
    name: String,
    config: MachineConfig,
    states: Vec<StateBuilder<R>>,
    transitions: Vec<TransitionBuilder<R>>,
    groups: Vec<GroupBuilder>,
    pending: Vec<DefinitionError>,
}

impl<R> MachineBuilder<R> {
    /// Create a new builder for the machine called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: MachineConfig::default(),
            states: Vec::new(),
            transitions: Vec::new(),
            groups: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Switch audit logging on or off.
    pub fn log_transitions(mut self, enabled: bool) -> Self {
        self.config.log_transitions = enabled;
        self
    }

    /// Add a state.
    pub fn state(mut self, state: StateBuilder<R>) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: Vec<StateBuilder<R>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: TransitionBuilder<R>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionBuilder<R>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn group(mut self, group: GroupBuilder) -> Self {
        self.groups.push(group);
        self
    }

    /// Attach an arrival handler to an already declared state.
    pub fn on_state<F>(mut self, state: &str, handler: F) -> Self
    where
        F: Fn(&mut R) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        match self.states.iter_mut().find(|s| s.name == state) {
            Some(builder) => builder.set_handler(Arc::new(handler)),
            None => self.unknown_target("state", state),
        }
        self
    }

    /// Attach a handler to an already declared transition.
    pub fn on_transition<F>(mut self, transition: &str, handler: F) -> Self
    where
        F: Fn(&mut R, Option<&dyn Actor>, &ExtraArgs) -> Result<(), CallbackError>
            + Send
            + Sync
            + 'static,
    {
        match self.transitions.iter_mut().find(|t| t.name == transition) {
            Some(builder) => builder.set_handler(Arc::new(handler)),
            None => self.unknown_target("transition", transition),
        }
        self
    }

    /// Attach a permission check to an already declared transition.
    pub fn permission<F>(mut self, transition: &str, check: F) -> Self
    where
        F: Fn(&R, &dyn Actor) -> bool + Send + Sync + 'static,
    {
        match self.transitions.iter_mut().find(|t| t.name == transition) {
            Some(builder) => builder.set_permission(Arc::new(check)),
            None => self.unknown_target("transition", transition),
        }
        self
    }

    /// Attach validation rules to an already declared transition.
    pub fn validate(mut self, transition: &str, rules: ValidationRules<R>) -> Self {
        match self.transitions.iter_mut().find(|t| t.name == transition) {
            Some(builder) => builder.add_validation(rules),
            None => self.unknown_target("transition", transition),
        }
        self
    }

    fn unknown_target(&mut self, kind: &'static str, name: &str) {
        self.pending.push(DefinitionError::UnknownHandlerTarget {
            machine: self.name.clone(),
            kind,
            name: name.to_string(),
        });
    }

    /// Build the state machine.
    /// Returns the first definition error if the declarations are invalid.
    pub fn build(self) -> Result<StateMachine<R>, DefinitionError> {
        let machine = self.name;

        if let Some(error) = self.pending.into_iter().next() {
            return Err(error);
        }

        let (templates, concrete): (Vec<_>, Vec<_>) =
            self.states.into_iter().partition(|s| s.is_abstract);
        if let Some(template) = templates.iter().find(|t| t.initial) {
            return Err(DefinitionError::AbstractInitialState {
                state: template.name.clone(),
                machine,
            });
        }
        let templates: HashMap<String, StateBuilder<R>> = templates
            .into_iter()
            .map(|t| (t.name.to_lowercase(), t))
            .collect();

        let mut states: Vec<StateDefinition<R>> = Vec::with_capacity(concrete.len());
        let mut state_index = HashMap::new();
        let mut initial: Option<usize> = None;

        for builder in concrete {
            let state = builder.build(&machine, &templates)?;
            if state_index.contains_key(&state.name) {
                return Err(DefinitionError::DuplicateState {
                    machine,
                    state: state.name,
                });
            }
            debug!(machine = %machine, state = %state.name, "found state");

            if state.is_initial {
                if let Some(first) = initial {
                    return Err(DefinitionError::MultipleInitialStates {
                        first: states[first].name.clone(),
                        machine,
                        second: state.name,
                    });
                }
                debug!(machine = %machine, state = %state.name, "found initial state");
                initial = Some(states.len());
            }

            state_index.insert(state.name.clone(), states.len());
            states.push(state);
        }

        let Some(initial) = initial else {
            return Err(DefinitionError::MissingInitialState { machine });
        };

        let mut transitions: Vec<StateTransition<R>> = Vec::with_capacity(self.transitions.len());
        let mut transition_index = HashMap::new();

        for builder in self.transitions {
            let mut transition = builder.build(&machine)?;
            if transition_index.contains_key(&transition.name) {
                return Err(DefinitionError::DuplicateTransition {
                    machine,
                    transition: transition.name,
                });
            }

            let referenced = transition
                .from_states
                .iter()
                .chain(std::iter::once(&transition.to_state));
            for state in referenced {
                if !state_index.contains_key(state) {
                    return Err(DefinitionError::UnknownStateReference {
                        machine,
                        owner: transition.name.clone(),
                        state: state.clone(),
                    });
                }
            }

            let target = &states[state_index[&transition.to_state]];
            transition.to_state_description = target.description.clone();
            debug!(machine = %machine, transition = %transition.name, "found state transition");

            transition_index.insert(transition.name.clone(), transitions.len());
            transitions.push(transition);
        }

        let mut groups: Vec<StateGroup> = Vec::with_capacity(self.groups.len());
        for builder in self.groups {
            let group = builder.build(&machine, |state| state_index.contains_key(state))?;
            if groups.iter().any(|g| g.name == group.name) {
                return Err(DefinitionError::DuplicateGroup {
                    machine,
                    group: group.name,
                });
            }
            debug!(machine = %machine, group = %group.name, "found state group");
            groups.push(group);
        }

        Ok(StateMachine {
            name: machine,
            config: self.config,
            states,
            state_index,
            transitions,
            transition_index,
            groups,
            initial,
        })
    }
}
