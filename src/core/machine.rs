//! The validated, read-only state machine.

use super::error::LookupError;
use super::group::{GroupMembership, StateGroup};
use super::state::StateDefinition;
use super::transition::StateTransition;
use crate::config::MachineConfig;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A validated machine: states, transitions and groups for one kind of record.
///
/// Built once by [`MachineBuilder`](crate::builder::MachineBuilder) and shared
/// (usually behind an `Arc`) by every record using it. There is no interior
/// mutability, so lookups need no locking.
pub struct StateMachine<R> {
    pub(crate) name: String,
    pub(crate) config: MachineConfig,
    pub(crate) states: Vec<StateDefinition<R>>,
    pub(crate) state_index: HashMap<String, usize>,
    pub(crate) transitions: Vec<StateTransition<R>>,
    pub(crate) transition_index: HashMap<String, usize>,
    pub(crate) groups: Vec<StateGroup>,
    pub(crate) initial: usize,
}

impl<R> StateMachine<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Whether transition attempts on this machine are audited.
    pub fn logs_transitions(&self) -> bool {
        self.config.log_transitions
    }

    pub fn initial_state(&self) -> &StateDefinition<R> {
        &self.states[self.initial]
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.state_index.contains_key(name)
    }

    pub fn get_state(&self, name: &str) -> Result<&StateDefinition<R>, LookupError> {
        self.state_index
            .get(name)
            .map(|&index| &self.states[index])
            .ok_or_else(|| LookupError::UnknownState {
                machine: self.name.clone(),
                state: name.to_string(),
            })
    }

    pub fn has_transition(&self, name: &str) -> bool {
        self.transition_index.contains_key(name)
    }

    pub fn get_transition(&self, name: &str) -> Result<&StateTransition<R>, LookupError> {
        self.transition_index
            .get(name)
            .map(|&index| &self.transitions[index])
            .ok_or_else(|| LookupError::UnknownTransition {
                machine: self.name.clone(),
                transition: name.to_string(),
            })
    }

    /// Find the transition leading from `from` to `to`.
    ///
    /// The first matching transition in declaration order wins; machines
    /// should not declare two transitions between the same pair of states.
    pub fn get_transition_between(
        &self,
        from: &str,
        to: &str,
    ) -> Result<&StateTransition<R>, LookupError> {
        self.transitions
            .iter()
            .find(|t| t.can_start_from(from) && t.to_state == to)
            .ok_or_else(|| LookupError::TransitionNotFound {
                machine: self.name.clone(),
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Membership of `state` in every declared group.
    ///
    /// Never fails, not even for unknown states or groups.
    pub fn group_membership(&self, state: &str) -> GroupMembership {
        GroupMembership::from_groups(&self.groups, state)
    }

    /// Transitions that can start from `state`, in declaration order.
    pub fn transitions_from(&self, state: &str) -> Vec<&StateTransition<R>> {
        self.transitions
            .iter()
            .filter(|t| t.can_start_from(state))
            .collect()
    }

    /// `(name, description)` pairs for every state, in declaration order.
    pub fn state_choices(&self) -> Vec<(String, String)> {
        self.states
            .iter()
            .map(|s| (s.name.clone(), s.description.clone()))
            .collect()
    }

    pub fn states(&self) -> &[StateDefinition<R>] {
        &self.states
    }

    pub fn transitions(&self) -> &[StateTransition<R>] {
        &self.transitions
    }

    pub fn groups(&self) -> &[StateGroup] {
        &self.groups
    }

    /// Render the machine as a Graphviz DOT document.
    ///
    /// One rectangular node per state and one edge per source state of each
    /// transition. Edge labels break the transition name at underscores.
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<String, &str> = DiGraph::new();
        let nodes: Vec<NodeIndex> = self
            .states
            .iter()
            .map(|state| graph.add_node(state.name.to_uppercase()))
            .collect();

        for transition in &self.transitions {
            let Some(&to) = self.state_index.get(&transition.to_state) else {
                continue;
            };
            for from in &transition.from_states {
                if let Some(&from) = self.state_index.get(from) {
                    graph.add_edge(nodes[from], nodes[to], transition.name.as_str());
                }
            }
        }

        let name = escape_dot(&self.name);
        format!(
            "digraph \"state_machine_graph_{name}\" {{\n    label=\"State Machine Graph {name}\";\n{}}}\n",
            Dot::with_attr_getters(
                &graph,
                &[Config::EdgeNoLabel, Config::GraphContentOnly],
                &|_, edge| format!(
                    "label=\"{}\", arrowhead=normal, fontsize=8, fontname=\"Arial\" ",
                    edge_label(edge.weight())
                ),
                &|_, _| "shape=rect, fontname=\"Arial\" ".to_string(),
            )
        )
    }
}

/// Transition name with one word per line.
fn edge_label(transition: &str) -> String {
    transition
        .split('_')
        .map(escape_dot)
        .collect::<Vec<_>>()
        .join("\\n_")
}

/// Escape text for a quoted DOT identifier.
fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<R> std::fmt::Debug for StateMachine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("states", &self.states)
            .field("transitions", &self.transitions)
            .field("groups", &self.groups)
            .field("initial", &self.initial_state().name)
            .finish()
    }
}
