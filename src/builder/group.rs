//! Builder for state groups.

use crate::builder::declaration::StateList;
use crate::builder::error::DefinitionError;
use crate::core::{GroupPolicy, StateGroup};
use std::collections::BTreeSet;

/// Builder for a group, declared by inclusion or by exclusion (never both).
pub struct GroupBuilder {
    pub(crate) name: String,
    description: String,
    states: Option<StateList>,
    exclude_states: Option<StateList>,
}

impl GroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            states: None,
            exclude_states: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The group contains exactly these states.
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = Some(StateList::Many(states.into_iter().map(Into::into).collect()));
        self
    }

    /// The group contains every state except these.
    pub fn exclude_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_states = Some(StateList::Many(states.into_iter().map(Into::into).collect()));
        self
    }

    pub(crate) fn from_lists(
        name: String,
        description: Option<String>,
        states: Option<StateList>,
        exclude_states: Option<StateList>,
    ) -> Self {
        Self {
            name,
            description: description.unwrap_or_default(),
            states,
            exclude_states,
        }
    }

    /// Build the group; `is_state` tells which names are declared states.
    pub(crate) fn build(
        self,
        machine: &str,
        is_state: impl Fn(&str) -> bool,
    ) -> Result<StateGroup, DefinitionError> {
        let (list, include) = match (self.states, self.exclude_states) {
            (Some(_), Some(_)) => {
                return Err(DefinitionError::GroupPolicyConflict {
                    machine: machine.to_string(),
                    group: self.name,
                })
            }
            (None, None) => {
                return Err(DefinitionError::MissingGroupPolicy {
                    machine: machine.to_string(),
                    group: self.name,
                })
            }
            (Some(list), None) => (list, true),
            (None, Some(list)) => (list, false),
        };

        let names = match list {
            StateList::Many(names) => names,
            StateList::One(value) => {
                return Err(DefinitionError::GroupNotASet {
                    machine: machine.to_string(),
                    group: self.name,
                    value,
                })
            }
        };

        if names.is_empty() {
            return Err(DefinitionError::EmptyGroup {
                machine: machine.to_string(),
                group: self.name,
            });
        }

        if let Some(unknown) = names.iter().find(|name| !is_state(name.as_str())) {
            return Err(DefinitionError::UnknownStateReference {
                machine: machine.to_string(),
                owner: self.name.clone(),
                state: unknown.clone(),
            });
        }

        let set: BTreeSet<String> = names.into_iter().collect();
        let policy = if include {
            GroupPolicy::Include(set)
        } else {
            GroupPolicy::Exclude(set)
        };

        Ok(StateGroup {
            name: self.name,
            description: self.description,
            policy,
        })
    }
}
