//! State groups for membership queries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How a group selects its states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPolicy {
    /// Exactly the listed states.
    Include(BTreeSet<String>),
    /// Every state except the listed ones.
    Exclude(BTreeSet<String>),
}

/// A named subset of a machine's states, e.g. "error states".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGroup {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) policy: GroupPolicy,
}

impl StateGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn policy(&self) -> &GroupPolicy {
        &self.policy
    }

    /// Check whether `state` belongs to this group (pure).
    pub fn contains(&self, state: &str) -> bool {
        match &self.policy {
            GroupPolicy::Include(states) => states.contains(state),
            GroupPolicy::Exclude(states) => !states.contains(state),
        }
    }
}

/// Group membership of one state, keyed by group name.
///
/// Asking about a group that does not exist answers `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupMembership {
    groups: BTreeMap<String, bool>,
}

impl GroupMembership {
    pub(crate) fn from_groups<'a>(
        groups: impl IntoIterator<Item = &'a StateGroup>,
        state: &str,
    ) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|group| (group.name.clone(), group.contains(state)))
                .collect(),
        }
    }

    pub fn get(&self, group: &str) -> bool {
        self.groups.get(group).copied().unwrap_or(false)
    }

    /// Names of the groups the state belongs to.
    pub fn member_of(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .filter(|(_, member)| **member)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.groups.iter().map(|(name, member)| (name.as_str(), *member))
    }
}
