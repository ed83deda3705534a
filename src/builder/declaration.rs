//! Data-driven machine declarations.
//!
//! A [`MachineDeclaration`] describes states, transitions and groups as plain
//! data (typically JSON). Callbacks cannot be expressed as data; attach them
//! to the resulting builder by name with
//! [`MachineBuilder::on_state`](crate::builder::MachineBuilder::on_state),
//! [`on_transition`](crate::builder::MachineBuilder::on_transition),
//! [`permission`](crate::builder::MachineBuilder::permission) and
//! [`validate`](crate::builder::MachineBuilder::validate).

use crate::builder::error::DefinitionError;
use crate::builder::group::GroupBuilder;
use crate::builder::machine::MachineBuilder;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::config::MachineConfig;
use serde::{Deserialize, Serialize};

/// A list of state names, or a lone name where a list was expected.
///
/// The scalar form deserializes so that it can be reported as a
/// definition error instead of a parse error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateList {
    Many(Vec<String>),
    One(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDeclaration {
    pub name: String,
    #[serde(default)]
    pub config: MachineConfig,
    pub states: Vec<StateDeclaration>,
    #[serde(default)]
    pub transitions: Vec<TransitionDeclaration>,
    #[serde(default)]
    pub groups: Vec<GroupDeclaration>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDeclaration {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub initial: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub extends: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionDeclaration {
    pub name: String,
    #[serde(default)]
    pub from_state: Option<String>,
    #[serde(default)]
    pub from_states: Option<Vec<String>>,
    #[serde(default)]
    pub to_state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    /// Extra arguments the handler attached later will accept.
    #[serde(default)]
    pub handler_args: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDeclaration {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub states: Option<StateList>,
    #[serde(default)]
    pub exclude_states: Option<StateList>,
}

impl MachineDeclaration {
    /// Parse a declaration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::Declaration {
            reason: e.to_string(),
        })
    }

    /// Turn the declaration into a builder, ready for callbacks.
    pub fn into_builder<R>(self) -> MachineBuilder<R> {
        let states = self.states.into_iter().map(|decl| {
            let mut state = StateBuilder::new(decl.name);
            if let Some(description) = decl.description {
                state = state.description(description);
            }
            if let Some(base) = decl.extends {
                state = state.extends(base);
            }
            if decl.initial {
                state = state.initial();
            }
            if decl.is_abstract {
                state = state.abstract_base();
            }
            state
        });

        let transitions = self.transitions.into_iter().map(|decl| {
            let mut transition = TransitionBuilder::new(decl.name).handler_args(decl.handler_args);
            if let Some(state) = decl.from_state {
                transition = transition.from(state);
            }
            if let Some(states) = decl.from_states {
                transition = transition.from_any(states);
            }
            if let Some(state) = decl.to_state {
                transition = transition.to(state);
            }
            if let Some(description) = decl.description {
                transition = transition.description(description);
            }
            if decl.public {
                transition = transition.public();
            }
            transition
        });

        let builder = MachineBuilder::new(self.name)
            .config(self.config)
            .states(states.collect())
            .transitions(transitions.collect());

        self.groups.into_iter().fold(builder, |builder, decl| {
            builder.group(GroupBuilder::from_lists(
                decl.name,
                decl.description,
                decl.states,
                decl.exclude_states,
            ))
        })
    }
}

impl<R> MachineBuilder<R> {
    /// Start a builder from a JSON machine declaration.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        Ok(MachineDeclaration::from_json_str(json)?.into_builder())
    }
}
